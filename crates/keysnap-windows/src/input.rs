use std::mem;

use keysnap_core::WindowResult;
use keysnap_core::keys::KeyCombo;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, SendInput, VIRTUAL_KEY, VK_CONTROL,
};

/// Presses the modifiers, taps the key, then releases the modifiers in
/// reverse order, as one atomic `SendInput` batch.
pub fn send_combo(combo: &KeyCombo) -> WindowResult<()> {
    let inputs = combo_inputs(combo);

    let sent = unsafe { SendInput(&inputs, mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(format!("SendInput injected {sent} of {} events", inputs.len()).into());
    }
    Ok(())
}

/// Whether either Ctrl key is physically down right now.
pub fn ctrl_held() -> bool {
    unsafe { GetAsyncKeyState(i32::from(VK_CONTROL.0)) < 0 }
}

fn combo_inputs(combo: &KeyCombo) -> Vec<INPUT> {
    let mut inputs = Vec::with_capacity(combo.modifiers.len() * 2 + 2);
    inputs.extend(combo.modifiers.iter().map(|&m| key_input(m, false)));
    inputs.push(key_input(combo.key, false));
    inputs.push(key_input(combo.key, true));
    inputs.extend(combo.modifiers.iter().rev().map(|&m| key_input(m, true)));
    inputs
}

fn key_input(vk: u32, up: bool) -> INPUT {
    let mut flags = KEYBD_EVENT_FLAGS(0);
    if up {
        flags |= KEYEVENTF_KEYUP;
    }
    if is_extended(vk) {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }

    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(vk as u16),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Keys that live on the extended part of the keyboard and need
/// `KEYEVENTF_EXTENDEDKEY` to be told apart from their keypad twins.
fn is_extended(vk: u32) -> bool {
    matches!(
        vk,
        0x21..=0x28      // page up/down, end, home, arrows
            | 0x2D | 0x2E // insert, delete
            | 0x5B..=0x5D // windows keys, apps
            | 0x6F        // keypad divide
            | 0x90        // num lock
            | 0xA3 | 0xA5 // right ctrl, right alt
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_releases_in_reverse_order() {
        // Arrange
        let combo = KeyCombo::parse("ctrl+shift+add").unwrap();

        // Act
        let inputs = combo_inputs(&combo);

        // Assert
        let keys: Vec<(u16, bool)> = inputs
            .iter()
            .map(|i| unsafe {
                (
                    i.Anonymous.ki.wVk.0,
                    (i.Anonymous.ki.dwFlags.0 & KEYEVENTF_KEYUP.0) != 0,
                )
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                (0x11, false),
                (0x10, false),
                (0x6B, false),
                (0x6B, true),
                (0x10, true),
                (0x11, true),
            ]
        );
    }

    #[test]
    fn navigation_keys_are_extended() {
        assert!(is_extended(0x25));
        assert!(is_extended(0xA3));
        assert!(!is_extended(0x6B));
        assert!(!is_extended(0x41));
    }
}
