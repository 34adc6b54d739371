//! MQTT v3.1.1 packet encoding and decoding
//!
//! Only the packets needed by a device client are supported: CONNECT, PUBLISH,
//! PUBACK, SUBSCRIBE and PINGREQ are encoded; CONNACK, PUBLISH,
//! PUBACK, SUBACK and PINGRESP are decoded.

/// Quality of service level of a publish or subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum QoS {
    /// At most once delivery
    AtMostOnce = 0,
    /// At least once delivery
    AtLeastOnce = 1,
}

impl QoS {
    fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::AtMostOnce),
            1 => Some(Self::AtLeastOnce),
            _ => None,
        }
    }
}

pub(crate) const CONNECT: u8 = 0x10;
pub(crate) const CONNACK: u8 = 0x20;
pub(crate) const PUBLISH: u8 = 0x30;
pub(crate) const PUBACK: u8 = 0x40;
pub(crate) const SUBSCRIBE: u8 = 0x82;
pub(crate) const SUBACK: u8 = 0x90;
pub(crate) const PINGREQ: u8 = 0xC0;
pub(crate) const PINGRESP: u8 = 0xD0;

const PROTOCOL_NAME: &str = "MQTT";
const PROTOCOL_LEVEL: u8 = 4;

/// Largest value the remaining length field can carry
pub const MAX_REMAINING_LENGTH: usize = 268_435_455;

/// Encoding or decoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketError {
    /// Output buffer cannot hold the packet
    BufferTooSmall,
    /// Packet does not follow the protocol
    Malformed,
}

/// An application message received from the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publish<'a> {
    pub topic: &'a str,
    pub payload: &'a [u8],
    pub qos: QoS,
    pub retain: bool,
    /// Present for QoS 1 messages
    pub packet_id: Option<u16>,
}

/// A decoded inbound packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packet<'a> {
    ConnAck { session_present: bool, return_code: u8 },
    Publish(Publish<'a>),
    PubAck(u16),
    SubAck { packet_id: u16, granted: u8 },
    PingResp,
}

/// Encode the variable-length remaining length field.
///
/// Returns the number of bytes written to `out`.
pub fn encode_remaining_length(mut len: usize, out: &mut [u8; 4]) -> Result<usize, PacketError> {
    if len > MAX_REMAINING_LENGTH {
        return Err(PacketError::Malformed);
    }
    let mut i = 0;
    loop {
        #[allow(clippy::cast_possible_truncation)]
        let mut byte = (len % 128) as u8;
        len /= 128;
        if len > 0 {
            byte |= 0x80;
        }
        out[i] = byte;
        i += 1;
        if len == 0 {
            return Ok(i);
        }
    }
}

/// Decode the remaining length field from the start of `bytes`.
///
/// Returns the decoded length and the number of bytes consumed, or `None`
/// when more bytes are needed.
pub fn decode_remaining_length(bytes: &[u8]) -> Result<Option<(usize, usize)>, PacketError> {
    let mut value = 0usize;
    let mut multiplier = 1usize;
    for (i, byte) in bytes.iter().enumerate() {
        if i == 4 {
            return Err(PacketError::Malformed);
        }
        value += usize::from(byte & 0x7F) * multiplier;
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
        multiplier *= 128;
    }
    if bytes.len() >= 4 {
        return Err(PacketError::Malformed);
    }
    Ok(None)
}

/// Connection parameters written into a CONNECT packet
pub struct ConnectParams<'a> {
    pub client_id: &'a str,
    pub keep_alive_secs: u16,
    pub clean_session: bool,
    pub username: Option<&'a str>,
    pub password: Option<&'a [u8]>,
}

/// Bounded cursor over an output buffer
struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put_u8(&mut self, value: u8) -> Result<(), PacketError> {
        self.put_bytes(&[value])
    }

    fn put_u16(&mut self, value: u16) -> Result<(), PacketError> {
        self.put_bytes(&value.to_be_bytes())
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), PacketError> {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(PacketError::BufferTooSmall);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    /// Length-prefixed binary data
    fn put_data(&mut self, bytes: &[u8]) -> Result<(), PacketError> {
        let len = u16::try_from(bytes.len()).map_err(|_| PacketError::Malformed)?;
        self.put_u16(len)?;
        self.put_bytes(bytes)
    }

    fn put_header(&mut self, header: u8, remaining: usize) -> Result<(), PacketError> {
        let mut len_bytes = [0u8; 4];
        let n = encode_remaining_length(remaining, &mut len_bytes)?;
        self.put_u8(header)?;
        self.put_bytes(&len_bytes[..n])
    }
}

/// Bounded cursor over an inbound packet body
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], PacketError> {
        let end = self.pos + n;
        if end > self.buf.len() {
            return Err(PacketError::Malformed);
        }
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, PacketError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, PacketError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn str(&mut self) -> Result<&'a str, PacketError> {
        let len = usize::from(self.u16()?);
        core::str::from_utf8(self.take(len)?).map_err(|_| PacketError::Malformed)
    }

    fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.buf[self.pos..];
        self.pos = self.buf.len();
        bytes
    }
}

pub fn encode_connect(buf: &mut [u8], params: &ConnectParams<'_>) -> Result<usize, PacketError> {
    let mut flags = 0u8;
    if params.clean_session {
        flags |= 0x02;
    }
    let mut remaining = 2 + PROTOCOL_NAME.len() + 1 + 1 + 2 + 2 + params.client_id.len();
    if let Some(username) = params.username {
        flags |= 0x80;
        remaining += 2 + username.len();
    }
    if let Some(password) = params.password {
        flags |= 0x40;
        remaining += 2 + password.len();
    }

    let mut w = Writer::new(buf);
    w.put_header(CONNECT, remaining)?;
    w.put_data(PROTOCOL_NAME.as_bytes())?;
    w.put_u8(PROTOCOL_LEVEL)?;
    w.put_u8(flags)?;
    w.put_u16(params.keep_alive_secs)?;
    w.put_data(params.client_id.as_bytes())?;
    if let Some(username) = params.username {
        w.put_data(username.as_bytes())?;
    }
    if let Some(password) = params.password {
        w.put_data(password)?;
    }
    Ok(w.pos)
}

/// Encode a PUBLISH packet. `packet_id` is required for QoS 1.
pub fn encode_publish(
    buf: &mut [u8],
    topic: &str,
    payload: &[u8],
    qos: QoS,
    retain: bool,
    packet_id: Option<u16>,
) -> Result<usize, PacketError> {
    let mut header = PUBLISH | ((qos as u8) << 1);
    if retain {
        header |= 0x01;
    }
    let mut remaining = 2 + topic.len() + payload.len();
    if qos != QoS::AtMostOnce {
        remaining += 2;
    }

    let mut w = Writer::new(buf);
    w.put_header(header, remaining)?;
    w.put_data(topic.as_bytes())?;
    if qos != QoS::AtMostOnce {
        w.put_u16(packet_id.ok_or(PacketError::Malformed)?)?;
    }
    w.put_bytes(payload)?;
    Ok(w.pos)
}

pub fn encode_subscribe(
    buf: &mut [u8],
    packet_id: u16,
    topic: &str,
    qos: QoS,
) -> Result<usize, PacketError> {
    let remaining = 2 + 2 + topic.len() + 1;
    let mut w = Writer::new(buf);
    w.put_header(SUBSCRIBE, remaining)?;
    w.put_u16(packet_id)?;
    w.put_data(topic.as_bytes())?;
    w.put_u8(qos as u8)?;
    Ok(w.pos)
}

pub fn encode_puback(buf: &mut [u8], packet_id: u16) -> Result<usize, PacketError> {
    let mut w = Writer::new(buf);
    w.put_header(PUBACK, 2)?;
    w.put_u16(packet_id)?;
    Ok(w.pos)
}

pub fn encode_pingreq(buf: &mut [u8]) -> Result<usize, PacketError> {
    let mut w = Writer::new(buf);
    w.put_header(PINGREQ, 0)?;
    Ok(w.pos)
}

/// Decode a packet from its fixed header byte and body.
///
/// Returns `Ok(None)` for packet types a client never needs to act on.
pub fn decode(header: u8, body: &[u8]) -> Result<Option<Packet<'_>>, PacketError> {
    let mut r = Reader::new(body);
    let packet = match header & 0xF0 {
        CONNACK => {
            let flags = r.u8()?;
            let return_code = r.u8()?;
            Packet::ConnAck {
                session_present: flags & 0x01 != 0,
                return_code,
            }
        }
        PUBLISH => {
            let qos = QoS::from_bits((header >> 1) & 0x03).ok_or(PacketError::Malformed)?;
            let topic = r.str()?;
            let packet_id = match qos {
                QoS::AtMostOnce => None,
                QoS::AtLeastOnce => Some(r.u16()?),
            };
            Packet::Publish(Publish {
                topic,
                payload: r.rest(),
                qos,
                retain: header & 0x01 != 0,
                packet_id,
            })
        }
        PUBACK => Packet::PubAck(r.u16()?),
        SUBACK => Packet::SubAck {
            packet_id: r.u16()?,
            granted: r.u8()?,
        },
        PINGRESP => Packet::PingResp,
        _ => return Ok(None),
    };
    Ok(Some(packet))
}
