use evview::window::{close_on_exit_key, is_exit_key, CloseFlag, Key, KeyAction};

#[test]
fn exit_keys() {
    assert!(is_exit_key(Key::Escape));
    assert!(is_exit_key(Key::Q));
    assert!(!is_exit_key(Key::Other));
}

#[test]
fn keyboard_callback_closes() {
    for key in [Key::Escape, Key::Q] {
        let flag = CloseFlag::default();
        let mut callback = close_on_exit_key(flag.clone());
        callback(Key::Other, KeyAction::Press);
        assert!(!flag.is_set());
        callback(key, KeyAction::Release);
        assert!(flag.is_set());
    }
}
