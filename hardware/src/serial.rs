//! Serial port transport for an IMU link
//!
//! Reads are chunked into a local buffer and handed out one byte at a time.
//! A read that times out means no input is waiting.

use std::io::{self, Read, Write};
use std::time::Duration;

use log::info;
use serialport::SerialPort;

use crista::{ByteSink, ByteSource, LinkError};

use crate::config::LinkConfig;

const READ_CHUNK: usize = 1024;

pub struct SerialLink<P> {
    port: P,
    buf: [u8; READ_CHUNK],
    pos: usize,
    len: usize,
}

impl<P> SerialLink<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            buf: [0; READ_CHUNK],
            pos: 0,
            len: 0,
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Bytes already read from the port but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.len - self.pos
    }
}

impl SerialLink<Box<dyn SerialPort>> {
    /// Open the port named in `config`.
    pub fn open(config: &LinkConfig) -> Result<Self, serialport::Error> {
        info!(
            "Opening serial port: {} at {} bps",
            config.port, config.baud_rate
        );

        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .open()?;

        Ok(Self::new(port))
    }
}

impl<P: Read> ByteSource for SerialLink<P> {
    fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        if self.pos == self.len {
            self.pos = 0;
            self.len = 0;
            let n = match self.port.read(&mut self.buf) {
                Ok(n) => n,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut
                            | io::ErrorKind::WouldBlock
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    0
                }
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                return Ok(None);
            }
            self.len = n;
        }

        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }
}

impl<P: Write> ByteSink for SerialLink<P> {
    fn write_block(&mut self, data: &[u8]) -> Result<usize, LinkError> {
        let written = self.port.write(data)?;
        self.port.flush()?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Port that returns queued read results in order.
    struct ScriptedPort {
        reads: VecDeque<io::Result<Vec<u8>>>,
        written: Vec<u8>,
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.reads.pop_front() {
                Some(Ok(chunk)) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                Some(Err(e)) => Err(e),
                None => Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
            }
        }
    }

    impl Write for ScriptedPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn scripted(reads: Vec<io::Result<Vec<u8>>>) -> SerialLink<ScriptedPort> {
        SerialLink::new(ScriptedPort {
            reads: reads.into(),
            written: Vec::new(),
        })
    }

    #[test]
    fn test_bytes_handed_out_in_order() {
        let mut link = scripted(vec![Ok(vec![1, 2, 3]), Ok(vec![4])]);
        assert_eq!(link.read_byte().unwrap(), Some(1));
        assert_eq!(link.buffered(), 2);
        assert_eq!(link.read_byte().unwrap(), Some(2));
        assert_eq!(link.read_byte().unwrap(), Some(3));
        assert_eq!(link.read_byte().unwrap(), Some(4));
        assert_eq!(link.read_byte().unwrap(), None);
    }

    #[test]
    fn test_timeout_is_no_data() {
        let mut link = scripted(vec![
            Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
            Ok(vec![9]),
        ]);
        assert_eq!(link.read_byte().unwrap(), None);
        assert_eq!(link.read_byte().unwrap(), Some(9));
    }

    #[test]
    fn test_hard_error_propagates() {
        let mut link = scripted(vec![Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "unplugged",
        ))]);
        assert!(matches!(link.read_byte(), Err(LinkError::Io(_))));
    }

    #[test]
    fn test_link_over_serial() {
        let frame = crista::encode_resolution(300.0, 10.0);
        let bytes = frame.as_bytes();
        let serial = scripted(vec![Ok(bytes[..5].to_vec()), Ok(bytes[5..].to_vec())]);

        let mut link = crista::ImuLink::new(serial);
        link.send(&crista::encode_config_request()).unwrap();
        assert_eq!(
            link.poll().unwrap(),
            vec![crista::MessageType::Resolution]
        );
        assert_eq!(link.data().gyro_range, 300.0);
        assert_eq!(link.io().port().written.len(), 7);
    }
}
