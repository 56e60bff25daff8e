//! Synthetic ride data for the simulator.

/// Highest speed the cluster can show, in km/h.
pub const MAX_DISPLAY_SPEED: f32 = 99.9;

/// Frames between injected controller faults.
const FAULT_PERIOD: u32 = 600;

/// Frames an injected fault stays active.
const FAULT_FRAMES: u32 = 60;

/// Time advanced per frame, in signal units.
const TIME_STEP: f32 = 0.05;

/// One frame of controller readings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Readings {
    /// Raw wheel speed; the controller occasionally reports nonsense.
    pub speed_kmh: f32,
    pub power_w: f32,
    pub motor_temp_c: f32,
    pub battery_v: f32,
    pub fault: Option<u8>,
}

impl Readings {
    /// Speed in tenths of km/h, clamped to what the display can show.
    pub fn display_speed(&self) -> u16 {
        (self.speed_kmh.clamp(0.0, MAX_DISPLAY_SPEED) * 10.0).round() as u16
    }
}

/// Slowly varying signals plus a periodic controller fault.
#[derive(Default)]
pub struct Telemetry {
    t: f32,
    frame: u32,
    fault_code: u8,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next frame. Power follows the selected assist level.
    pub fn sample(
        &mut self,
        assist_level: u8,
        nominal_volts: f32,
    ) -> Readings {
        let t = self.t;
        self.t += TIME_STEP;
        self.frame = self.frame.wrapping_add(1);

        let fault = if self.frame % FAULT_PERIOD < FAULT_FRAMES && self.frame >= FAULT_PERIOD {
            if self.frame % FAULT_PERIOD == 0 {
                self.fault_code = self.fault_code % 9 + 1;
                log::warn!("injecting controller fault {}", self.fault_code);
            }
            Some(self.fault_code)
        } else {
            None
        };

        // A spike every now and then, like a loose speed sensor magnet
        let speed_kmh = if self.frame % 257 == 0 { 250.0 } else { fake_signal(t, 0.0, 45.0, 0.05) };
        let power_w = f32::from(assist_level) * fake_signal(t, 40.0, 160.0, 0.11);

        Readings {
            speed_kmh,
            power_w,
            motor_temp_c: fake_signal(t, 30.0, 95.0, 0.02),
            battery_v: nominal_volts * fake_signal(t, 0.85, 1.1, 0.01),
            fault,
        }
    }
}

fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}
