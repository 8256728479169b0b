mod common;

use brickpi3::sensor::{CustomConfig, CustomPins, I2cConfig, I2cRepeat, I2cSettings};
use brickpi3::{
    Brick, BrickError, MOTOR_FLOAT, MessageType, MotorFlags, MotorPort, SensorConfig, SensorPort,
    SensorType, SensorValue, Version,
};
use common::{ADDRESS, name, read_request, reply, silent, spi, write};

#[test]
fn test_connect_reads_board_info() {
    let mut serial = vec![0u8; 16];
    serial[0] = 0x12;
    serial[15] = 0xEF;

    let mut mock = spi(vec![
        (read_request(ADDRESS, 1, 20), reply(&name("Dexter Industries"))),
        (read_request(ADDRESS, 2, 20), reply(&name("BrickPi3"))),
        (read_request(ADDRESS, 3, 4), reply(&[0x00, 0x2D, 0xCE, 0x91])),
        (read_request(ADDRESS, 4, 4), reply(&[0x00, 0x0F, 0x51, 0xE4])),
        (read_request(ADDRESS, 5, 16), reply(&serial)),
    ]);

    let brick = Brick::connect(mock.clone(), ADDRESS).unwrap();
    let info = brick.info().unwrap();
    assert_eq!(info.manufacturer, "Dexter Industries");
    assert_eq!(info.board, "BrickPi3");
    assert_eq!(info.hardware_version, Version::from(3_002_001));
    assert_eq!(info.hardware_version.to_string(), "3.2.1");
    assert_eq!(info.firmware_version.to_string(), "1.4.4");
    assert_eq!(info.id.to_string(), "120000000000000000000000000000EF");
    mock.done();
}

#[test]
fn test_voltages_are_read_live() {
    let mut mock = spi(vec![
        (read_request(ADDRESS, 7, 2), reply(&[0x0C, 0xE4])),
        (read_request(ADDRESS, 8, 2), reply(&[0x13, 0x88])),
        (read_request(ADDRESS, 9, 2), reply(&[0x23, 0x28])),
        (read_request(ADDRESS, 10, 2), reply(&[0x1F, 0x40])),
        (read_request(ADDRESS, 10, 2), reply(&[0x1E, 0x78])),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    let v = brick.voltages().unwrap();
    assert_eq!(v.v3_3, 3.3);
    assert_eq!(v.v5, 5.0);
    assert_eq!(v.v9, 9.0);
    assert_eq!(v.battery, 8.0);
    assert_eq!(brick.voltage_battery().unwrap(), 7.8);
    mock.done();
}

#[test]
fn test_missing_sentinel_is_no_response() {
    let mut mock = spi(vec![(read_request(ADDRESS, 8, 2), silent(6))]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    let err = brick.voltage_5v().unwrap_err();
    assert!(matches!(
        err,
        BrickError::NoResponse {
            message: MessageType::GetVoltage5v,
            ..
        }
    ));
    mock.done();
}

#[test]
fn test_ultrasonic_cm_read() {
    let mut mock = spi(vec![
        write(vec![ADDRESS, 12, 0x01, 23]),
        (read_request(ADDRESS, 13, 4), reply(&[23, 0, 0x03, 0xE8])),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick
        .set_sensor_type(&[SensorPort::Port1], SensorType::Ev3UltrasonicCm)
        .unwrap();
    assert_eq!(brick.sensor_type(SensorPort::Port1), SensorType::Ev3UltrasonicCm);
    assert_eq!(
        brick.read_sensor(SensorPort::Port1).unwrap(),
        SensorValue::Scalar(100)
    );
    mock.done();
}

#[test]
fn test_gyro_reads_negative_angle() {
    let mut mock = spi(vec![
        write(vec![ADDRESS, 12, 0x02, 15]),
        (read_request(ADDRESS, 14, 4), reply(&[15, 0, 0xFF, 0x9C])),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick
        .set_sensor_type(&[SensorPort::Port2], SensorType::Ev3GyroAbs)
        .unwrap();
    assert_eq!(
        brick.read_sensor(SensorPort::Port2).unwrap().as_i32(),
        Some(-100)
    );
    mock.done();
}

#[test]
fn test_sensor_read_without_sentinel_is_no_response() {
    // payload would otherwise be a valid gyro reading
    let mut bad = reply(&[15, 0, 0x00, 0x10]);
    bad[3] = 0x00;
    let mut mock = spi(vec![
        write(vec![ADDRESS, 12, 0x01, 15]),
        (read_request(ADDRESS, 13, 4), bad),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick
        .set_sensor_type(&[SensorPort::Port1], SensorType::Ev3GyroAbs)
        .unwrap();
    assert!(matches!(
        brick.read_sensor(SensorPort::Port1),
        Err(BrickError::NoResponse { .. })
    ));
    mock.done();
}

#[test]
fn test_echoed_type_mismatch_is_sensor_error() {
    let mut mock = spi(vec![
        write(vec![ADDRESS, 12, 0x01, 15]),
        // board still reports the previous type with valid state
        (read_request(ADDRESS, 13, 4), reply(&[16, 0, 0x00, 0x10])),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick
        .set_sensor_type(&[SensorPort::Port1], SensorType::Ev3GyroAbs)
        .unwrap();
    assert!(matches!(
        brick.read_sensor(SensorPort::Port1),
        Err(BrickError::Sensor {
            port: SensorPort::Port1,
            ..
        })
    ));
    mock.done();
}

#[test]
fn test_touch_port_accepts_ev3_touch() {
    let mut mock = spi(vec![
        write(vec![ADDRESS, 12, 0x08, 4]),
        (read_request(ADDRESS, 16, 3), reply(&[6, 0, 1])),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick.set_sensor_type(&[SensorPort::Port4], SensorType::Touch).unwrap();
    assert_eq!(
        brick.read_sensor(SensorPort::Port4).unwrap(),
        SensorValue::State(1)
    );
    mock.done();
}

#[test]
fn test_retype_changes_next_read() {
    let mut mock = spi(vec![
        write(vec![ADDRESS, 12, 0x01, 15]),
        (read_request(ADDRESS, 13, 4), reply(&[15, 0, 0x00, 0x5A])),
        write(vec![ADDRESS, 12, 0x01, 6]),
        (read_request(ADDRESS, 13, 3), reply(&[6, 0, 0])),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick
        .set_sensor_type(&[SensorPort::Port1], SensorType::Ev3GyroAbs)
        .unwrap();
    assert_eq!(
        brick.read_sensor(SensorPort::Port1).unwrap(),
        SensorValue::Scalar(90)
    );
    brick
        .set_sensor_type(&[SensorPort::Port1], SensorType::Ev3Touch)
        .unwrap();
    assert_eq!(
        brick.read_sensor(SensorPort::Port1).unwrap(),
        SensorValue::State(0)
    );
    mock.done();
}

#[test]
fn test_unconfigured_port_fails_without_traffic() {
    let mut mock = spi(vec![]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    assert!(matches!(
        brick.read_sensor(SensorPort::Port3),
        Err(BrickError::NoResponse {
            message: MessageType::GetSensor3,
            ..
        })
    ));
    mock.done();
}

#[test]
fn test_multi_port_type_set_is_one_request() {
    let mut mock = spi(vec![write(vec![ADDRESS, 12, 0x05, 9])]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick
        .set_sensor_type(
            &[SensorPort::Port1, SensorPort::Port3],
            SensorType::NxtColorRed,
        )
        .unwrap();
    assert_eq!(brick.sensor_type(SensorPort::Port1), SensorType::NxtColorRed);
    assert_eq!(brick.sensor_type(SensorPort::Port2), SensorType::None);
    assert_eq!(brick.sensor_type(SensorPort::Port3), SensorType::NxtColorRed);
    mock.done();
}

#[test]
fn test_custom_sensor_config_and_read() {
    let mut mock = spi(vec![
        write(vec![ADDRESS, 12, 0x02, 3, 0x10, 0x00]),
        (
            read_request(ADDRESS, 14, 6),
            reply(&[3, 0, 0x01, 0x00, 0x0F, 0xFF]),
        ),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick
        .set_sensor_type(
            &[SensorPort::Port2],
            SensorConfig::Custom(CustomConfig::PIN1_ADC),
        )
        .unwrap();
    assert_eq!(
        brick.read_sensor(SensorPort::Port2).unwrap(),
        SensorValue::Custom(CustomPins {
            pin1_adc: 0xFFF,
            pin6_adc: 0,
            pin5_digital: true,
            pin6_digital: false,
        })
    );
    mock.done();
}

#[test]
fn test_i2c_repeat_and_transact() {
    let config = SensorConfig::I2c(I2cConfig {
        settings: I2cSettings::MID_CLOCK | I2cSettings::PIN1_9V,
        speed_us: 0,
        repeat: Some(I2cRepeat {
            delay_us: 0,
            address: 0x02,
            out: vec![0x42],
            in_bytes: 1,
        }),
    });
    let mut mock = spi(vec![
        write(vec![ADDRESS, 12, 0x04, 2, 0x07, 0, 0, 0, 0, 0, 0x02, 1, 1, 0x42]),
        (read_request(ADDRESS, 15, 3), reply(&[2, 0, 0x37])),
        write(vec![ADDRESS, 19, 0x02, 2, 2, 0x41, 0x02]),
        (read_request(ADDRESS, 15, 4), reply(&[2, 0, 0xAA, 0xBB])),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick.set_sensor_type(&[SensorPort::Port3], config).unwrap();
    assert_eq!(brick.sensors().i2c_in_bytes(SensorPort::Port3), 1);
    assert_eq!(
        brick.read_sensor(SensorPort::Port3).unwrap(),
        SensorValue::I2c(vec![0x37])
    );

    brick
        .transact_i2c(SensorPort::Port3, 0x02, &[0x41, 0x02], 2)
        .unwrap();
    assert_eq!(
        brick.read_sensor(SensorPort::Port3).unwrap(),
        SensorValue::I2c(vec![0xAA, 0xBB])
    );
    mock.done();
}

#[test]
fn test_transact_i2c_requires_i2c_port() {
    let mut mock = spi(vec![]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    assert!(matches!(
        brick.transact_i2c(SensorPort::Port1, 0x02, &[0x41], 1),
        Err(BrickError::Sensor { .. })
    ));
    mock.done();
}

#[test]
fn test_motor_power_is_clamped() {
    let mut mock = spi(vec![
        write(vec![ADDRESS, 21, 0x01, 0x7F]),
        write(vec![ADDRESS, 21, 0x03, 0x80]),
        write(vec![ADDRESS, 21, 0x08, 0x9C]),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick.set_motor_power(&[MotorPort::A], 200).unwrap();
    brick
        .set_motor_power(&[MotorPort::A, MotorPort::B], -200)
        .unwrap();
    brick.set_motor_power(&[MotorPort::D], -100).unwrap();
    mock.done();
}

#[test]
fn test_motor_setpoints() {
    let mut mock = spi(vec![
        write(vec![ADDRESS, 22, 0x04, 0xFF, 0xFE, 0x1D, 0xC0]),
        write(vec![ADDRESS, 25, 0x02, 0xFE, 0x98]),
        write(vec![ADDRESS, 28, 0x01, 50, 0x01, 0xF4]),
        write(vec![ADDRESS, 28, 0x01, 100, 0x00, 0x00]),
        write(vec![ADDRESS, 26, 0x0F, 30]),
        write(vec![ADDRESS, 27, 0x0F, 60]),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick.set_motor_position(&[MotorPort::C], -123_456).unwrap();
    brick.set_motor_dps(&[MotorPort::B], -360).unwrap();
    brick.set_motor_limits(&[MotorPort::A], 50, 500).unwrap();
    brick.set_motor_limits(&[MotorPort::A], 150, 0).unwrap();
    brick.set_motor_dps_kp(&MotorPort::ALL, 30).unwrap();
    brick.set_motor_dps_kd(&MotorPort::ALL, 60).unwrap();
    mock.done();
}

#[test]
fn test_encoder_read_and_reset() {
    let mut mock = spi(vec![
        (read_request(ADDRESS, 30, 4), reply(&[0xFF, 0xFF, 0xFF, 0xFF])),
        (read_request(ADDRESS, 31, 4), reply(&[0x00, 0x00, 0x01, 0x68])),
        write(vec![ADDRESS, 29, 0x02, 0x00, 0x00, 0x01, 0x68]),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    assert_eq!(brick.motor_encoder(MotorPort::A).unwrap(), -1);
    assert_eq!(brick.reset_motor_encoder(MotorPort::B).unwrap(), 360);
    mock.done();
}

#[test]
fn test_motor_status_decode() {
    let mut mock = spi(vec![(
        read_request(ADDRESS, 36, 8),
        reply(&[0x02, 0xCE, 0xFF, 0xFF, 0xFF, 0x9C, 0xFE, 0x0C]),
    )]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    let status = brick.motor_status(MotorPort::C).unwrap();
    assert_eq!(status.flags, MotorFlags::OVERLOADED);
    assert!(status.flags.overloaded());
    assert!(!status.flags.low_voltage_float());
    assert_eq!(status.speed, -50);
    assert_eq!(status.encoder, -100);
    assert_eq!(status.dps, -500);
    mock.done();
}

#[test]
fn test_set_address_pins_new_address() {
    let mut frame = vec![0, 11, 5];
    frame.extend_from_slice(&[
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
        0xFF,
    ]);
    let mut mock = spi(vec![
        (frame, reply(&[0; 15])),
        (read_request(5, 8, 2), reply(&[0x13, 0x88])),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick
        .set_address(5, Some("00112233445566778899AABBCCDDEEFF"))
        .unwrap();
    assert_eq!(brick.address(), 5);
    assert_eq!(brick.voltage_5v().unwrap(), 5.0);
    mock.done();
}

#[test]
fn test_set_address_without_response_keeps_address() {
    let mut frame = vec![0, 11, 7];
    frame.extend_from_slice(&[0; 16]);
    let mut mock = spi(vec![(frame, silent(19))]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    assert!(matches!(
        brick.set_address(7, None),
        Err(BrickError::NoResponse { .. })
    ));
    assert_eq!(brick.address(), ADDRESS);
    mock.done();
}

#[test]
fn test_set_address_rejects_bad_input_before_sending() {
    let mut mock = spi(vec![]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    assert!(matches!(
        brick.set_address(5, Some("1234")),
        Err(BrickError::Validation(_))
    ));
    assert!(matches!(
        brick.set_address(5, Some("ZZ112233445566778899AABBCCDDEEFF")),
        Err(BrickError::Validation(_))
    ));
    assert!(matches!(
        brick.set_address(0, None),
        Err(BrickError::Validation(_))
    ));
    mock.done();
}

#[test]
fn test_reset_all() {
    let mut mock = spi(vec![
        write(vec![ADDRESS, 12, 0x0F, 1]),
        write(vec![ADDRESS, 21, 0x0F, 0x80]),
        write(vec![ADDRESS, 28, 0x0F, 0, 0, 0]),
        write(vec![ADDRESS, 23, 0x0F, 25]),
        write(vec![ADDRESS, 24, 0x0F, 70]),
        write(vec![ADDRESS, 6, 255]),
    ]);

    let mut brick = Brick::new(mock.clone(), ADDRESS);
    brick.reset_all().unwrap();
    for port in SensorPort::ALL {
        assert_eq!(brick.sensor_type(port), SensorType::None);
    }
    assert_eq!(MOTOR_FLOAT, -128);
    mock.done();
}
