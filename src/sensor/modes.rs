// Operating modes of the LEGO sensors and the sensor type each one selects
//
// Modes cycle through a fixed order; next()/previous() wrap around.

use super::types::SensorType;

pub trait ModeCycle: Copy + PartialEq + 'static {
    /// Every mode, in cycling order
    const ORDER: &'static [Self];

    fn sensor_type(self) -> SensorType;

    fn next(self) -> Self {
        let order = Self::ORDER;
        let i = order.iter().position(|m| *m == self).unwrap_or(0);
        order[(i + 1) % order.len()]
    }

    fn previous(self) -> Self {
        let order = Self::ORDER;
        let i = order.iter().position(|m| *m == self).unwrap_or(0);
        order[(i + order.len() - 1) % order.len()]
    }
}

macro_rules! sensor_modes {
    ($(#[$meta:meta])* $name:ident { $($mode:ident => $ty:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($mode),+
        }

        impl ModeCycle for $name {
            const ORDER: &'static [Self] = &[$($name::$mode),+];

            fn sensor_type(self) -> SensorType {
                match self {
                    $($name::$mode => SensorType::$ty),+
                }
            }
        }
    };
}

sensor_modes!(
    /// EV3 colour sensor
    Ev3ColorMode {
        Color => Ev3ColorColor,
        Reflection => Ev3ColorReflected,
        RawReflection => Ev3ColorRawReflected,
        Components => Ev3ColorColorComponents,
        Ambient => Ev3ColorAmbient,
    }
);

sensor_modes!(
    /// EV3 gyro sensor
    Ev3GyroMode {
        Angle => Ev3GyroAbs,
        AngularVelocity => Ev3GyroDps,
        AngleAndVelocity => Ev3GyroAbsDps,
    }
);

sensor_modes!(
    /// EV3 infrared sensor
    Ev3InfraredMode {
        Proximity => Ev3InfraredProximity,
        Seek => Ev3InfraredSeek,
        Remote => Ev3InfraredRemote,
    }
);

sensor_modes!(
    /// EV3 ultrasonic sensor
    Ev3UltrasonicMode {
        Centimeter => Ev3UltrasonicCm,
        Inch => Ev3UltrasonicInches,
        Listen => Ev3UltrasonicListen,
    }
);

sensor_modes!(
    /// NXT colour sensor
    NxtColorMode {
        Color => NxtColorFull,
        Reflection => NxtColorRed,
        Green => NxtColorGreen,
        Blue => NxtColorBlue,
        Ambient => NxtColorOff,
    }
);

sensor_modes!(
    /// NXT light sensor
    NxtLightMode {
        Reflection => NxtLightOn,
        Ambient => NxtLightOff,
    }
);
