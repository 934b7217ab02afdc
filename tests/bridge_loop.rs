//! Dispatch loop end to end on the loopback platform: liveness, round-trip
//! fidelity, receive ordering under overflow.
mod helpers;

use canbridge::{
    bridge::Bridge,
    platform::loopback::{LoopbackPlatform, RX_QUEUE_SLOTS},
    transport::can_frame::CanMessage,
};
use helpers::std_id;

type LoopBridge = Bridge<LoopbackPlatform, 8, 16>;

#[test]
fn test_boot_logs_and_loop_stays_live() {
    let mut bridge = LoopBridge::boot(LoopbackPlatform::new(2)).unwrap();
    assert!(bridge
        .logger_mut()
        .sink()
        .lines
        .iter()
        .any(|line| line.starts_with("bridge up")));

    for _ in 0..1_000 {
        bridge.run_once();
    }
    assert_eq!(bridge.iterations(), 1_000);
}

#[test]
fn test_echo_round_trip_fidelity() {
    let mut bridge = LoopBridge::boot(LoopbackPlatform::new(1).with_echo()).unwrap();

    let original = CanMessage::new(std_id(0x2D0), &[0xDE, 0xAD, 0xBE, 0xEF, 0x42]).unwrap();
    bridge.queue_frame(0, original).unwrap();

    // Iteration 1 transmits, the echo lands in the receive queue;
    // iteration 2 polls it back out.
    bridge.run_once();
    bridge.run_once();

    let frames = &bridge.pipeline().frames;
    assert_eq!(frames.len(), 1);
    let (bus, received, _) = &frames[0];
    assert_eq!(*bus, 0);
    assert_eq!(received.id(), original.id());
    assert_eq!(received.payload(), original.payload());
    assert_eq!(received.len(), original.len());
}

#[test]
fn test_receive_overflow_drops_but_never_corrupts() {
    let mut bridge = LoopBridge::boot(LoopbackPlatform::new(1)).unwrap();
    let capacity = RX_QUEUE_SLOTS - 1;

    // Burst past queue capacity before the loop gets to run.
    let mut delivered = 0;
    for seq in 0..capacity as u8 + 5 {
        let frame = CanMessage::new(std_id(0x300), &[seq]).unwrap();
        if bridge.bus_mut(0).unwrap().inject(frame) {
            delivered += 1;
        }
    }
    assert_eq!(delivered, capacity);
    assert_eq!(bridge.bus(0).unwrap().dropped(), 5);

    // Survivors come out intact and in receipt order.
    for _ in 0..capacity + 3 {
        bridge.run_once();
    }
    let frames = &bridge.pipeline().frames;
    assert_eq!(frames.len(), capacity);
    for (seq, (_, message, _)) in frames.iter().enumerate() {
        assert_eq!(message.payload(), &[seq as u8]);
    }
}

#[test]
fn test_receive_overflow_is_reported_in_the_log() {
    let mut bridge = LoopBridge::boot(LoopbackPlatform::new(1)).unwrap();

    // Four more frames than the queue can hold, before the loop runs.
    for seq in 0..RX_QUEUE_SLOTS as u8 + 3 {
        let frame = CanMessage::new(std_id(0x300), &[seq]).unwrap();
        bridge.bus_mut(0).unwrap().inject(frame);
    }
    assert_eq!(bridge.bus(0).unwrap().dropped(), 4);

    // The next iteration consumes the counter and reports the total once.
    bridge.run_once();
    assert_eq!(bridge.bus(0).unwrap().dropped(), 0);
    let overflow_lines = bridge
        .logger_mut()
        .sink()
        .lines
        .iter()
        .filter(|line| line.starts_with("receive overflow on bus 0: 4"))
        .count();
    assert_eq!(overflow_lines, 1);

    // Quiet iterations add nothing.
    bridge.run_once();
    bridge.run_once();
    assert_eq!(
        bridge
            .logger_mut()
            .sink()
            .lines
            .iter()
            .filter(|line| line.starts_with("receive overflow"))
            .count(),
        1
    );
}

#[test]
fn test_debug_log_macro_reaches_the_platform_sink() {
    let mut bridge = LoopBridge::boot(LoopbackPlatform::new(1)).unwrap();
    canbridge::debug_log!(bridge.logger_mut(), "bitrate set to {} kbit/s", 500);
    assert!(bridge
        .logger_mut()
        .sink()
        .lines
        .iter()
        .any(|line| line.as_str() == "bitrate set to 500 kbit/s"));
}

#[test]
fn test_two_buses_are_independent() {
    let mut bridge = LoopBridge::boot(LoopbackPlatform::new(2)).unwrap();
    bridge
        .queue_frame(0, CanMessage::new(std_id(0x100), &[0]).unwrap())
        .unwrap();
    bridge
        .queue_frame(1, CanMessage::new(std_id(0x200), &[1]).unwrap())
        .unwrap();

    bridge.run_once();
    assert_eq!(bridge.bus(0).unwrap().sent().len(), 1);
    assert_eq!(bridge.bus(1).unwrap().sent().len(), 1);
    assert_eq!(bridge.bus(0).unwrap().sent()[0].payload(), &[0]);
    assert_eq!(bridge.bus(1).unwrap().sent()[0].payload(), &[1]);
}
