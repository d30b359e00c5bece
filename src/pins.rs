//! Pin assignments and PWM timing for the chassis controller board.
//!
//! Single source of truth: every adapter references this module rather
//! than hard-coding pin numbers or servo timing.

// ---------------------------------------------------------------------------
// Actuator outputs
// ---------------------------------------------------------------------------

/// ESC signal for the drive motor.
pub const MOTOR_PWM_GPIO: i32 = 23;
/// Signal line of the steering servo.
pub const STEERING_PWM_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Servo timing
// ---------------------------------------------------------------------------

/// Standard RC servo/ESC frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// One frame at [`SERVO_PWM_FREQ_HZ`], in microseconds.
pub const SERVO_PERIOD_US: u16 = (1_000_000 / SERVO_PWM_FREQ_HZ) as u16;

