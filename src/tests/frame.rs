use crate::frame::CanFrame;
use embedded_can::{ExtendedId, Frame, Id, StandardId};

#[test]
fn test_new_data_frame() {
    let id = ExtendedId::new(0x0304_1805).unwrap();
    let frame = CanFrame::new(id, &[1, 2, 3]).unwrap();

    assert_eq!(Id::Extended(id), frame.id());
    assert!(frame.is_extended());
    assert!(!frame.is_remote_frame());
    assert_eq!(3, frame.dlc());
    assert_eq!([1, 2, 3], frame.data());
}

#[test]
fn test_new_data_frame_too_long() {
    let id = StandardId::new(0x12).unwrap();
    assert!(CanFrame::new(id, &[0; 9]).is_none());
}

#[test]
fn test_new_remote_frame() {
    let id = StandardId::new(0x12).unwrap();
    let frame = CanFrame::new_remote(id, 4).unwrap();

    assert!(!frame.is_extended());
    assert!(frame.is_remote_frame());
    assert_eq!(4, frame.dlc());
    assert!(frame.data().is_empty());

    assert!(CanFrame::new_remote(id, 9).is_none());
}
