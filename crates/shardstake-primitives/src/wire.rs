use crate::address::{Address, ADDRESS_LEN};
use crate::errors::CodecError;
use std::io::{self, Read, Write};

/// Maximum length of any length-prefixed byte array: 16 MiB.
pub const MAX_VAR_BYTES: u64 = 16 * 1024 * 1024;

/// Maximum payload length of a varuint: 8 value bytes plus one sign byte.
pub const MAX_VAR_UINT_BYTES: usize = 9;

/// Returns the minimal little-endian two's-complement bytes of `value`.
///
/// Zero is the empty byte string. A `0x00` byte is appended when the top
/// bit of the last byte is set so the value never reads back as negative.
pub fn var_uint_bytes(value: u64) -> Vec<u8> {
    let mut bytes = value.to_le_bytes().to_vec();
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    if bytes.last().is_some_and(|b| b & 0x80 != 0) {
        bytes.push(0);
    }
    bytes
}

/// Inverse of [`var_uint_bytes`]; rejects negative, oversized and non-minimal forms.
pub fn var_uint_from_bytes(bytes: &[u8]) -> Result<u64, &'static str> {
    let Some(&last) = bytes.last() else {
        return Ok(0);
    };
    if bytes.len() > MAX_VAR_UINT_BYTES {
        return Err("more than 9 bytes");
    }
    if last & 0x80 != 0 {
        return Err("negative value");
    }
    if last == 0 {
        match bytes.len() {
            1 => return Err("zero must be encoded as an empty byte string"),
            n if bytes[n - 2] & 0x80 == 0 => return Err("redundant trailing zero byte"),
            _ => {}
        }
    } else if bytes.len() == MAX_VAR_UINT_BYTES {
        return Err("value exceeds u64 range");
    }
    let mut raw = [0u8; 8];
    let n = bytes.len().min(8);
    raw[..n].copy_from_slice(&bytes[..n]);
    Ok(u64::from_le_bytes(raw))
}

/// Writer for wire primitives over any [`Write`] sink.
///
/// # Example
///
/// ```rust
/// use shardstake_primitives::WireWriter;
///
/// let mut writer = WireWriter::new(Vec::new());
/// writer.write_string("aa")?;
/// writer.write_var_uint(100)?;
/// assert_eq!(writer.into_inner(), vec![0x02, b'a', b'a', 0x01, 0x64]);
/// # Ok::<(), shardstake_primitives::CodecError>(())
/// ```
pub struct WireWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> WireWriter<W> {
    /// Wraps a sink.
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Returns the number of bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Returns the wrapped sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    /// Writes a compact-size integer (1, 3, 5 or 9 bytes).
    pub fn write_compact_size(&mut self, value: u64) -> Result<(), CodecError> {
        if value < 0xFD {
            self.put(&[value as u8])
        } else if value <= u16::MAX as u64 {
            self.put(&[0xFD])?;
            self.put(&(value as u16).to_le_bytes())
        } else if value <= u32::MAX as u64 {
            self.put(&[0xFE])?;
            self.put(&(value as u32).to_le_bytes())
        } else {
            self.put(&[0xFF])?;
            self.put(&value.to_le_bytes())
        }
    }

    /// Writes a compact-size length followed by the raw bytes.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.write_compact_size(bytes.len() as u64)?;
        self.put(bytes)
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) -> Result<(), CodecError> {
        self.write_var_bytes(value.as_bytes())
    }

    /// Writes a variable-length unsigned integer.
    pub fn write_var_uint(&mut self, value: u64) -> Result<(), CodecError> {
        self.write_var_bytes(&var_uint_bytes(value))
    }

    /// Writes a 20-byte address.
    pub fn write_address(&mut self, address: &Address) -> Result<(), CodecError> {
        self.write_var_bytes(address.as_bytes())
    }
}

/// Reader for wire primitives over any [`Read`] source.
///
/// Each `read_*` method takes the name of the field being read; it appears
/// in every error the read produces.
pub struct WireReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> WireReader<R> {
    /// Wraps a source.
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn take_exact(&mut self, buf: &mut [u8], field: &'static str, start: u64) -> Result<(), CodecError> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(CodecError::Truncated {
                field,
                offset: start,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads a compact-size integer, rejecting non-minimal encodings.
    pub fn read_compact_size(&mut self, field: &'static str) -> Result<u64, CodecError> {
        let start = self.position;
        let mut tag = [0u8; 1];
        self.take_exact(&mut tag, field, start)?;
        let (value, min) = match tag[0] {
            0xFD => {
                let mut b = [0u8; 2];
                self.take_exact(&mut b, field, start)?;
                (u16::from_le_bytes(b) as u64, 0xFD)
            }
            0xFE => {
                let mut b = [0u8; 4];
                self.take_exact(&mut b, field, start)?;
                (u32::from_le_bytes(b) as u64, 0x1_0000)
            }
            0xFF => {
                let mut b = [0u8; 8];
                self.take_exact(&mut b, field, start)?;
                (u64::from_le_bytes(b), 0x1_0000_0000)
            }
            small => return Ok(small as u64),
        };
        if value < min {
            return Err(CodecError::MalformedLength {
                field,
                reason: format!("non-minimal encoding of {}", value),
            });
        }
        Ok(value)
    }

    /// Reads a length-prefixed byte array of at most [`MAX_VAR_BYTES`].
    pub fn read_var_bytes(&mut self, field: &'static str) -> Result<Vec<u8>, CodecError> {
        let start = self.position;
        let len = self.read_compact_size(field)?;
        if len > MAX_VAR_BYTES {
            return Err(CodecError::MalformedLength {
                field,
                reason: format!("length {} exceeds maximum {}", len, MAX_VAR_BYTES),
            });
        }
        // Read through `take` so a lying prefix cannot force a large allocation.
        let mut bytes = Vec::new();
        (&mut self.inner).take(len).read_to_end(&mut bytes)?;
        self.position += bytes.len() as u64;
        if (bytes.len() as u64) < len {
            return Err(CodecError::Truncated {
                field,
                offset: start,
            });
        }
        Ok(bytes)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self, field: &'static str) -> Result<String, CodecError> {
        let bytes = self.read_var_bytes(field)?;
        String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 { field })
    }

    /// Reads a variable-length unsigned integer.
    pub fn read_var_uint(&mut self, field: &'static str) -> Result<u64, CodecError> {
        let bytes = self.read_var_bytes(field)?;
        var_uint_from_bytes(&bytes).map_err(|reason| CodecError::MalformedVarUint { field, reason })
    }

    /// Reads a 20-byte address.
    pub fn read_address(&mut self, field: &'static str) -> Result<Address, CodecError> {
        let bytes = self.read_var_bytes(field)?;
        let raw: [u8; ADDRESS_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| CodecError::MalformedAddress {
                    field,
                    len: bytes.len() as u64,
                })?;
        Ok(Address::new(raw))
    }

    /// Fails with [`CodecError::TrailingBytes`] if the source is not exhausted.
    pub fn ensure_exhausted(&mut self) -> Result<(), CodecError> {
        let mut probe = [0u8; 1];
        loop {
            match self.inner.read(&mut probe) {
                Ok(0) => return Ok(()),
                Ok(_) => {
                    return Err(CodecError::TrailingBytes {
                        offset: self.position,
                    })
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
