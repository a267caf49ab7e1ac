use super::*;

/// Emits a fixed list of packets once flushed.
struct ScriptedEncoder {
    packets: Vec<Packet>,
    flushed: bool,
    need_more_after_flush: bool,
}

impl FrameEncoder for ScriptedEncoder {
    fn send_frame(&mut self, frame: Option<&Frame>) -> InvertResult<()> {
        if frame.is_none() {
            self.flushed = true;
        }
        Ok(())
    }

    fn receive_packet(&mut self) -> InvertResult<Receive<Packet>> {
        if !self.flushed || self.need_more_after_flush {
            return Ok(Receive::NeedMore);
        }
        if self.packets.is_empty() {
            return Ok(Receive::Eof);
        }
        Ok(Receive::Ready(self.packets.remove(0)))
    }
}

fn frame() -> Frame {
    Frame::new(2, 2, PixelFormat::Rgb8).unwrap()
}

#[test]
fn for_frame_copies_size_and_pixel_format() {
    let f = Frame::new(7, 3, PixelFormat::GrayAlpha8).unwrap();
    let cfg = EncoderConfig::for_frame(CodecId::Png, &f);
    assert_eq!(cfg.width, 7);
    assert_eq!(cfg.height, 3);
    assert_eq!(cfg.pixel_format, PixelFormat::GrayAlpha8);
    assert_eq!(cfg.time_base, Rational::ONE);
    cfg.validate().unwrap();
    cfg.check_frame(&f).unwrap();
    assert!(cfg.check_frame(&frame()).is_err());
}

#[test]
fn validate_rejects_zero_sizes() {
    let mut cfg = EncoderConfig::for_frame(CodecId::Png, &frame());
    cfg.width = 0;
    assert!(cfg.validate().is_err());
    let mut cfg = EncoderConfig::for_frame(CodecId::Png, &frame());
    cfg.time_base = Rational { num: 1, den: 0 };
    assert!(cfg.validate().is_err());
}

#[test]
fn encode_frame_drains_every_packet() {
    let mut enc = ScriptedEncoder {
        packets: vec![Packet::new(0, vec![1, 2]), Packet::new(0, vec![3])],
        flushed: false,
        need_more_after_flush: false,
    };
    assert_eq!(encode_frame(&mut enc, &frame()).unwrap(), vec![1, 2, 3]);
}

#[test]
fn encode_frame_without_packets_is_an_error() {
    let mut enc = ScriptedEncoder {
        packets: Vec::new(),
        flushed: false,
        need_more_after_flush: false,
    };
    let err = encode_frame(&mut enc, &frame()).unwrap_err();
    assert!(matches!(err, InvertError::Encoder(_)), "{err}");
}

#[test]
fn encode_frame_rejects_need_more_after_flush() {
    let mut enc = ScriptedEncoder {
        packets: vec![Packet::new(0, vec![1])],
        flushed: false,
        need_more_after_flush: true,
    };
    assert!(matches!(
        encode_frame(&mut enc, &frame()),
        Err(InvertError::Encoder(_))
    ));
}
