//! Digital input/output over a port pin
//!
//! [`DigitalInOut`] binds one [`Pin`] for its lifetime and is the only thing
//! that reads or writes pin values. Every transition is checked against the
//! pin's capabilities; an illegal request returns an error and leaves both
//! the pin and the registers untouched.
//!
//! | Operation          | Valid while |
//! |--------------------|-------------|
//! | `value`            | any         |
//! | `set_value`        | output      |
//! | `pull`/`set_pull`  | input       |
//! | `drive_mode`/`set_drive_mode` | output |

use paraport_hal::PortIo;

use crate::bits::{check_bit, set_bit};
use crate::direction;
use crate::error::GpioError;
use crate::pin::{Direction, DriveMode, Pin, Pull};

/// A pin bound for digital I/O
///
/// Binding marks the pin in use; dropping the binding releases it so the
/// pin can be bound again.
///
/// Value writes are read-modify-write on a register byte that other pins
/// may share, so all bindings on one port must be driven from one thread.
pub struct DigitalInOut<'a, IO: PortIo + ?Sized> {
    pin: &'a Pin,
    io: &'a IO,
}

impl<'a, IO: PortIo + ?Sized> DigitalInOut<'a, IO> {
    /// Bind `pin`
    ///
    /// Fails with [`GpioError::PinInUse`] if another binding holds it.
    pub fn new(pin: &'a Pin, io: &'a IO) -> Result<Self, GpioError> {
        pin.bind()?;
        Ok(Self { pin, io })
    }

    /// The bound pin
    pub fn pin(&self) -> &Pin {
        self.pin
    }

    /// Current direction
    pub fn direction(&self) -> Direction {
        self.pin.direction()
    }

    /// Change direction
    ///
    /// For pins that propagate direction, the port direction bit is updated
    /// first (input = reverse, output = forward) and the pin's direction is
    /// recorded after.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), GpioError> {
        if !self.pin.allows(direction) {
            return Err(GpioError::DirectionNotAllowed(direction));
        }
        if self.pin.propagates_direction() {
            direction::set_direction(self.io, self.pin.register_address(), direction.into());
        }
        self.pin.record_direction(direction);
        Ok(())
    }

    /// Read the pin's register bit
    pub fn value(&self) -> bool {
        let byte = self.io.read_byte(self.pin.register_address());
        check_bit(byte, self.pin.bit_index())
    }

    /// Drive the pin's register bit
    ///
    /// Only valid as an output. Other bits of the register are written back
    /// unchanged.
    pub fn set_value(&mut self, value: bool) -> Result<(), GpioError> {
        self.require(Direction::Output)?;
        let address = self.pin.register_address();
        let current = self.io.read_byte(address);
        self.io
            .write_byte(address, set_bit(current, self.pin.bit_index(), value));
        Ok(())
    }

    /// Level at the connector
    ///
    /// Same as [`value`](Self::value) except on hardware inverted lines,
    /// where the register bit is the complement of the connector level.
    pub fn level(&self) -> bool {
        self.value() != self.pin.is_hw_inverted()
    }

    /// Drive the connector to `level`; only valid as an output
    pub fn set_level(&mut self, level: bool) -> Result<(), GpioError> {
        self.set_value(level != self.pin.is_hw_inverted())
    }

    /// Pull mode; only valid as an input
    pub fn pull(&self) -> Result<Pull, GpioError> {
        self.require(Direction::Input)?;
        Ok(self.pin.pull())
    }

    /// Set pull mode
    ///
    /// The hardware has no configurable pulls, so only the pin's fixed pull
    /// is accepted.
    pub fn set_pull(&mut self, pull: Pull) -> Result<(), GpioError> {
        self.require(Direction::Input)?;
        if pull != self.pin.pull() {
            return Err(GpioError::PullFixed {
                fixed: self.pin.pull(),
                requested: pull,
            });
        }
        Ok(())
    }

    /// Drive mode; only valid as an output
    pub fn drive_mode(&self) -> Result<DriveMode, GpioError> {
        self.require(Direction::Output)?;
        Ok(self.pin.drive_mode())
    }

    /// Set drive mode
    ///
    /// Only the pin's fixed drive mode is accepted.
    pub fn set_drive_mode(&mut self, drive_mode: DriveMode) -> Result<(), GpioError> {
        self.require(Direction::Output)?;
        if drive_mode != self.pin.drive_mode() {
            return Err(GpioError::DriveModeFixed {
                fixed: self.pin.drive_mode(),
                requested: drive_mode,
            });
        }
        Ok(())
    }

    /// Switch to output: direction, then value, then drive mode
    ///
    /// `None` keeps the pin's own drive mode. Stops at the first step that
    /// fails.
    pub fn switch_to_output(
        &mut self,
        value: bool,
        drive_mode: Option<DriveMode>,
    ) -> Result<(), GpioError> {
        self.set_direction(Direction::Output)?;
        self.set_value(value)?;
        self.set_drive_mode(drive_mode.unwrap_or(self.pin.drive_mode()))
    }

    /// Switch to input: direction, then pull
    pub fn switch_to_input(&mut self, pull: Pull) -> Result<(), GpioError> {
        self.set_direction(Direction::Input)?;
        self.set_pull(pull)
    }

    fn require(&self, direction: Direction) -> Result<(), GpioError> {
        match (self.pin.direction(), direction) {
            (Direction::Input, Direction::Input) | (Direction::Output, Direction::Output) => Ok(()),
            (_, Direction::Input) => Err(GpioError::NotAnInput),
            (_, Direction::Output) => Err(GpioError::NotAnOutput),
        }
    }
}

impl<IO: PortIo + ?Sized> Drop for DigitalInOut<'_, IO> {
    fn drop(&mut self) {
        self.pin.release();
    }
}

impl<IO: PortIo + ?Sized> core::fmt::Debug for DigitalInOut<'_, IO> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DigitalInOut")
            .field("pin", &self.pin.name())
            .field("register_address", &self.pin.register_address())
            .field("bit_index", &self.pin.bit_index())
            .field("direction", &self.pin.direction())
            .finish()
    }
}

impl<IO: PortIo + ?Sized> embedded_hal::digital::ErrorType for DigitalInOut<'_, IO> {
    type Error = GpioError;
}

impl<IO: PortIo + ?Sized> embedded_hal::digital::InputPin for DigitalInOut<'_, IO> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.value())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.value())
    }
}

impl<IO: PortIo + ?Sized> embedded_hal::digital::OutputPin for DigitalInOut<'_, IO> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_value(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_value(true)
    }
}

impl<IO: PortIo + ?Sized> embedded_hal::digital::StatefulOutputPin for DigitalInOut<'_, IO> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.require(Direction::Output)?;
        Ok(self.value())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.require(Direction::Output)?;
        Ok(!self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::PortAddress;
    use crate::direction::{get_direction, PortDirection, DIRECTION_BIT};
    use crate::error::ErrorKind;
    use crate::pin::PinArena;
    use paraport_hal::MockPortIo;

    const DATA: u16 = 0x378;
    const STATUS: u16 = 0x379;
    const CONTROL: u16 = 0x37A;

    fn data_pin(bit: u8) -> Pin {
        Pin::new(DATA, bit, true, true).unwrap().with_propagation()
    }

    #[test]
    fn test_binding_marks_pin() {
        let io = MockPortIo::new();
        let pin = data_pin(0);
        {
            let _dio = DigitalInOut::new(&pin, &io).unwrap();
            assert!(pin.is_in_use());
        }
        assert!(!pin.is_in_use());
    }

    #[test]
    fn test_second_binding_fails() {
        let io = MockPortIo::new();
        let pin = data_pin(0);
        let mut first = DigitalInOut::new(&pin, &io).unwrap();
        first.switch_to_output(true, Some(DriveMode::PushPull)).unwrap();

        let err = DigitalInOut::new(&pin, &io).unwrap_err();
        assert_eq!(err, GpioError::PinInUse);
        assert_eq!(err.kind(), ErrorKind::Binding);

        // First binding untouched
        assert!(pin.is_in_use());
        assert_eq!(first.direction(), Direction::Output);
        assert!(first.value());
        first.set_value(false).unwrap();
        assert!(!first.value());
    }

    #[test]
    fn test_rebind_after_drop() {
        let io = MockPortIo::new();
        let pin = data_pin(0);
        drop(DigitalInOut::new(&pin, &io).unwrap());
        assert!(DigitalInOut::new(&pin, &io).is_ok());
    }

    #[test]
    fn test_switch_to_output_on_lpt1() {
        let io = MockPortIo::new();
        // Port left in reverse
        io.set(CONTROL, 0x24);
        let pin = data_pin(5);
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        dio.switch_to_output(true, Some(DriveMode::PushPull)).unwrap();

        assert_eq!(get_direction(&io, DATA), PortDirection::Forward);
        assert!(!check_bit(io.get(CONTROL), DIRECTION_BIT));
        assert_eq!(io.get(CONTROL), 0x04);
        assert!(check_bit(io.get(DATA), 5));
        assert!(dio.value());
    }

    #[test]
    fn test_set_value_preserves_other_bits() {
        let io = MockPortIo::new();
        io.set(DATA, 0b1000_0001);
        let pin = data_pin(3);
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        dio.set_value(true).unwrap();
        assert_eq!(io.get(DATA), 0b1000_1001);
        dio.set_value(false).unwrap();
        assert_eq!(io.get(DATA), 0b1000_0001);
    }

    #[test]
    fn test_set_value_on_input_only_pin() {
        let io = MockPortIo::new();
        io.set(STATUS, 0x40);
        let pin = Pin::new(STATUS, 6, true, false).unwrap();
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        let err = dio.set_value(true).unwrap_err();
        assert_eq!(err, GpioError::NotAnOutput);
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(io.writes(STATUS), 0);
        assert_eq!(io.reads(STATUS), 0);
        assert!(dio.value());
    }

    #[test]
    fn test_output_not_allowed() {
        let io = MockPortIo::new();
        let pin = Pin::new(STATUS, 7, true, false).unwrap();
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        let err = dio.set_direction(Direction::Output).unwrap_err();
        assert_eq!(err, GpioError::DirectionNotAllowed(Direction::Output));
        assert_eq!(err.kind(), ErrorKind::Capability);
        assert_eq!(dio.direction(), Direction::Input);
    }

    #[test]
    fn test_input_not_allowed() {
        let io = MockPortIo::new();
        let pin = Pin::new(CONTROL, 0, false, true).unwrap();
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        assert_eq!(
            dio.switch_to_input(Pull::None),
            Err(GpioError::DirectionNotAllowed(Direction::Input))
        );
        assert_eq!(dio.direction(), Direction::Output);
        assert_eq!(io.writes(CONTROL), 0);
    }

    #[test]
    fn test_direction_propagates_to_port() {
        let io = MockPortIo::new();
        io.set(CONTROL, 0x04);
        let pin = data_pin(0);
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        dio.set_direction(Direction::Input).unwrap();
        assert_eq!(get_direction(&io, DATA), PortDirection::Reverse);
        assert_eq!(io.get(CONTROL), 0x24);

        dio.set_direction(Direction::Output).unwrap();
        assert_eq!(get_direction(&io, DATA), PortDirection::Forward);
    }

    #[test]
    fn test_no_propagation_without_flag() {
        let io = MockPortIo::new();
        let pin = Pin::new(DATA, 0, true, true).unwrap();
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        dio.set_direction(Direction::Input).unwrap();
        assert_eq!(dio.direction(), Direction::Input);
        assert_eq!(io.writes(CONTROL), 0);
    }

    #[test]
    fn test_pull_is_fixed() {
        let io = MockPortIo::new();
        let pin = Pin::new(STATUS, 6, true, false).unwrap();
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        let err = dio.set_pull(Pull::Up).unwrap_err();
        assert_eq!(
            err,
            GpioError::PullFixed {
                fixed: Pull::None,
                requested: Pull::Up
            }
        );
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(dio.pull(), Ok(Pull::None));
        assert!(dio.set_pull(Pull::None).is_ok());
    }

    #[test]
    fn test_pull_requires_input() {
        let io = MockPortIo::new();
        let pin = data_pin(1);
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        assert_eq!(dio.pull(), Err(GpioError::NotAnInput));
        assert_eq!(dio.set_pull(Pull::None), Err(GpioError::NotAnInput));
    }

    #[test]
    fn test_drive_mode() {
        let io = MockPortIo::new();
        let pin = Pin::new(CONTROL, 2, false, true)
            .unwrap()
            .with_drive_mode(DriveMode::OpenDrain);
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        assert_eq!(dio.drive_mode(), Ok(DriveMode::OpenDrain));
        assert!(dio.set_drive_mode(DriveMode::OpenDrain).is_ok());
        assert_eq!(
            dio.set_drive_mode(DriveMode::PushPull),
            Err(GpioError::DriveModeFixed {
                fixed: DriveMode::OpenDrain,
                requested: DriveMode::PushPull
            })
        );
    }

    #[test]
    fn test_drive_mode_requires_output() {
        let io = MockPortIo::new();
        let pin = Pin::new(STATUS, 3, true, false).unwrap();
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        assert_eq!(dio.drive_mode(), Err(GpioError::NotAnOutput));
        assert_eq!(
            dio.set_drive_mode(DriveMode::PushPull),
            Err(GpioError::NotAnOutput)
        );
    }

    #[test]
    fn test_switch_to_output_stops_at_drive_mode() {
        let io = MockPortIo::new();
        let pin = data_pin(2);
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();
        dio.set_direction(Direction::Input).unwrap();

        let err = dio.switch_to_output(true, Some(DriveMode::OpenDrain)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        // Direction and value were applied before the failing step
        assert_eq!(dio.direction(), Direction::Output);
        assert!(dio.value());
    }

    #[test]
    fn test_switch_to_input() {
        let io = MockPortIo::new();
        let pin = data_pin(4);
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        dio.switch_to_input(Pull::None).unwrap();
        assert_eq!(dio.direction(), Direction::Input);
        assert_eq!(dio.set_value(true), Err(GpioError::NotAnOutput));

        // Pull failure happens after the direction change
        assert!(dio.switch_to_input(Pull::Down).is_err());
        assert_eq!(dio.direction(), Direction::Input);
    }

    #[test]
    fn test_value_readable_in_any_direction() {
        let io = MockPortIo::new();
        io.set(DATA, 0x01);
        let pin = data_pin(0);
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        assert!(dio.value());
        dio.set_direction(Direction::Input).unwrap();
        assert!(dio.value());
    }

    #[test]
    fn test_embedded_hal_traits() {
        use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};

        let io = MockPortIo::new();
        let pin = data_pin(6);
        let mut dio = DigitalInOut::new(&pin, &io).unwrap();

        dio.set_high().unwrap();
        assert!(dio.is_set_high().unwrap());
        assert_eq!(io.get(DATA), 0x40);
        dio.toggle().unwrap();
        assert!(dio.is_low().unwrap());

        dio.set_direction(Direction::Input).unwrap();
        assert_eq!(dio.set_high(), Err(GpioError::NotAnOutput));
        assert_eq!(dio.is_set_low(), Err(GpioError::NotAnOutput));
    }

    #[test]
    fn test_bind_from_standard_map() {
        let io = MockPortIo::new();
        let pins = PinArena::standard(PortAddress::LPT1, true, PortDirection::Forward).unwrap();

        let mut d5 = DigitalInOut::new(pins.pin("D5").unwrap(), &io).unwrap();
        d5.switch_to_output(true, None).unwrap();
        assert_eq!(io.get(DATA), 0x20);

        let ack = DigitalInOut::new(pins.pin("ACK").unwrap(), &io).unwrap();
        assert_eq!(ack.pull(), Ok(Pull::None));
        assert!(DigitalInOut::new(pins.pin("D5").unwrap(), &io).is_err());
    }

    #[test]
    fn test_switch_to_output_default_drive_mode() {
        let io = MockPortIo::new();
        let pins = PinArena::standard(PortAddress::LPT1, false, PortDirection::Forward).unwrap();

        // Control lines are open drain; None accepts that without restating it
        let mut init = DigitalInOut::new(pins.pin("INITIALIZE").unwrap(), &io).unwrap();
        init.switch_to_output(true, None).unwrap();
        assert_eq!(init.drive_mode(), Ok(DriveMode::OpenDrain));
        assert!(init.value());

        assert_eq!(
            init.switch_to_output(false, Some(DriveMode::PushPull)),
            Err(GpioError::DriveModeFixed {
                fixed: DriveMode::OpenDrain,
                requested: DriveMode::PushPull,
            })
        );
    }

    #[test]
    fn test_level_follows_hw_inversion() {
        let io = MockPortIo::new();
        let pins = PinArena::standard(PortAddress::LPT1, false, PortDirection::Forward).unwrap();

        let mut strobe = DigitalInOut::new(pins.pin("STROBE").unwrap(), &io).unwrap();
        strobe.switch_to_output(false, None).unwrap();
        assert!(strobe.level());

        strobe.set_level(false).unwrap();
        assert_eq!(io.get(CONTROL) & 0x01, 0x01);
        assert!(strobe.value());
        assert!(!strobe.level());

        let busy = DigitalInOut::new(pins.pin("BUSY").unwrap(), &io).unwrap();
        io.set(STATUS, 0x80);
        assert!(!busy.level());
        io.set(STATUS, 0x00);
        assert!(busy.level());

        // Non-inverted lines read the register bit as is
        let mut d1 = DigitalInOut::new(pins.pin("D1").unwrap(), &io).unwrap();
        d1.set_level(true).unwrap();
        assert!(d1.level());
        assert_eq!(io.get(DATA), 0x02);

        let mut ack = DigitalInOut::new(pins.pin("ACK").unwrap(), &io).unwrap();
        assert_eq!(ack.set_level(true), Err(GpioError::NotAnOutput));
        assert_eq!(io.writes(STATUS), 0);
    }
}
