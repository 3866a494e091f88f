use msp_codec::{
    Decoder, Encoder, MspCode, Outcome, ParserState, RejectReason, Rejection, Role,
};

#[derive(Default)]
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        const A: u64 = 6364136223846793005;
        const C: u64 = 1442695040888963407;
        self.0 = self.0.wrapping_mul(A).wrapping_add(C);
        self.0 >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Damage {
    None,
    /// XOR one payload byte with a non-zero mask
    Flip,
    /// Lose one payload byte, as 3DR-style radios do
    Drop,
}

struct SentFrame {
    code: MspCode,
    payload: Vec<u8>,
    damage: Damage,
}

const CODES: [MspCode; 6] = [
    MspCode::Status,
    MspCode::Attitude,
    MspCode::Altitude,
    MspCode::Analog,
    MspCode::RawGps,
    MspCode::Feature,
];

fn xor(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc ^ b)
}

/// Payload bytes stay in 0x40..=0x7F and the last byte is chosen so the
/// frame checksum is never '$'. Garbage uses 0x80..=0xFF, so no damaged
/// frame can be mistaken for a valid one.
fn make_payload(rng: &mut Lcg, seq: u8, code: MspCode) -> Vec<u8> {
    let len = 3 + rng.below(30) as usize;
    let mut payload = vec![0x40 + (seq & 0x3F)];
    while payload.len() < len - 1 {
        payload.push(0x40 + rng.below(0x40) as u8);
    }
    let seed = xor(&payload) ^ len as u8 ^ code.as_u8();
    let pad = (0x40..=0x7Fu8)
        .find(|pad| seed ^ pad != b'$')
        .expect("a pad byte avoids '$'");
    payload.push(pad);
    payload
}

fn build_link(seed: u64, count: u8) -> (Vec<SentFrame>, Vec<u8>) {
    let mut rng = Lcg(seed);
    let encoder = Encoder::new(Role::FlightController);
    let mut sent = Vec::new();
    let mut wire = Vec::new();

    for seq in 0..count {
        let code = CODES[rng.below(CODES.len() as u64) as usize];
        let payload = make_payload(&mut rng, seq, code);
        let mut bytes = encoder.encode(code, &payload).unwrap();
        let target = 5 + rng.below(payload.len() as u64) as usize;

        let damage = match rng.below(10) {
            0 => {
                bytes[target] ^= 1 + rng.below(255) as u8;
                Damage::Flip
            }
            1 => {
                bytes.remove(target);
                Damage::Drop
            }
            _ => Damage::None,
        };
        wire.extend_from_slice(&bytes);

        if rng.below(4) == 0 {
            for _ in 0..=rng.below(8) {
                wire.push(0x80 + rng.below(0x80) as u8);
            }
        }

        sent.push(SentFrame {
            code,
            payload,
            damage,
        });
    }
    // Lets a short last frame reach its verdict.
    wire.push(0x80);

    (sent, wire)
}

#[test]
fn decoder_recovers_from_flips_drops_and_garbage() {
    for seed in [0xfeed_beef, 0x1234_5678, 42, 7] {
        let (sent, wire) = build_link(seed, 64);
        let mut decoder = Decoder::new(Role::GroundStation);

        let outcomes: Vec<Outcome> = wire
            .iter()
            .map(|&b| decoder.advance(b))
            .filter(|o| !o.is_pending())
            .collect();

        let delivered: Vec<_> = outcomes
            .iter()
            .filter_map(|o| match o {
                Outcome::Frame(frame) => Some((frame.code(), frame.payload().to_vec())),
                _ => None,
            })
            .collect();
        let expected: Vec<_> = sent
            .iter()
            .filter(|f| f.damage == Damage::None)
            .map(|f| (f.code, f.payload.clone()))
            .collect();
        assert_eq!(delivered, expected, "seed {seed:#x}");

        let damaged = sent.iter().filter(|f| f.damage != Damage::None).count();
        assert_eq!(outcomes.len(), sent.len(), "seed {seed:#x}");
        assert_eq!(decoder.error_count(), damaged as u64, "seed {seed:#x}");
        assert!(outcomes.iter().all(|o| match o {
            Outcome::Rejected(Rejection { reason, .. }) => reason.is_checksum(),
            Outcome::Frame(_) => true,
            _ => false,
        }));
        assert_eq!(decoder.state(), ParserState::Sync1);
    }
}

#[test]
fn dropped_byte_before_adjacent_frame_resyncs_on_dollar() {
    let encoder = Encoder::new(Role::FlightController);
    let mut first = encoder.encode(MspCode::Attitude, &[0x41, 0x42, 0x43, 0x44, 0x45, 0x46]).unwrap();
    let second = encoder.encode(MspCode::Altitude, &[0x50, 0x51, 0x52, 0x53, 0x54, 0x55]).unwrap();
    first.remove(7);

    let mut wire = first;
    wire.extend_from_slice(&second);
    let mut decoder = Decoder::new(Role::GroundStation);

    let outcomes = decoder.feed(&wire);
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(
        &outcomes[0],
        Outcome::Rejected(Rejection {
            reason: RejectReason::ChecksumMismatch { found: b'$', .. },
            code: MspCode::Attitude,
            ..
        })
    ));
    let frame = outcomes[1].clone().into_frame().unwrap();
    assert_eq!(frame.code(), MspCode::Altitude);
    assert_eq!(frame.payload().as_ref(), &[0x50, 0x51, 0x52, 0x53, 0x54, 0x55]);

    let metrics = decoder.metrics();
    assert_eq!(metrics.resyncs, 1);
    assert_eq!(metrics.frames_decoded, 1);
    assert_eq!(metrics.checksum_errors, 1);
}

#[test]
fn echoed_requests_are_filtered_on_half_duplex_link() {
    // A half-duplex radio hands our own requests back interleaved with replies.
    let ground = Encoder::new(Role::GroundStation);
    let vehicle = Encoder::new(Role::FlightController);
    let mut wire = Vec::new();
    for code in [MspCode::Status, MspCode::Rc, MspCode::Motor] {
        wire.extend(ground.encode(code, &[]).unwrap());
        wire.extend(vehicle.encode(code, &[0x42; 8]).unwrap());
    }
    let mut decoder = Decoder::new(Role::GroundStation);

    let outcomes = decoder.feed(&wire);
    let frames: Vec<_> = outcomes
        .iter()
        .filter_map(|o| o.clone().into_frame())
        .map(|f| f.code())
        .collect();
    assert_eq!(frames, [MspCode::Status, MspCode::Rc, MspCode::Motor]);
    assert_eq!(decoder.metrics().echo_frames, 3);
    assert_eq!(decoder.error_count(), 3);
}
