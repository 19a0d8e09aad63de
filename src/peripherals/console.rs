use core::fmt::{self, Write};

use crate::logger::LineSink;

/// Human-readable serial console. Anything implementing `core::fmt::Write`
/// works, e.g. a `Uarte`.
pub struct Console<W>(W);

impl<W: Write> Console<W> {
    pub fn new(port: W) -> Self {
        Console(port)
    }

    /// Direct access to the port, e.g. for reading
    pub fn port_mut(&mut self) -> &mut W {
        &mut self.0
    }

    pub fn free(self) -> W {
        self.0
    }
}

impl<W: Write> LineSink for Console<W> {
    type Error = fmt::Error;

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        self.0.write_str(text)
    }

    /// The serial port has no buffering of its own
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use core::fmt::{self, Write};

    use super::Console;
    use crate::logger::LineSink;

    pub struct Captured(pub heapless::String<64>);

    impl Write for Captured {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.0.push_str(s).map_err(|_| fmt::Error)
        }
    }

    pub fn write_line_uses_crlf() {
        let mut console = Console::new(Captured(heapless::String::new()));
        console.write_str("Logging to: ").unwrap();
        console.write_line("LOGGER00.CSV").unwrap();
        console.write_line("").unwrap();
        let captured = console.free();
        assert_eq!(captured.0.as_str(), "Logging to: LOGGER00.CSV\r\n\r\n");
    }
}
