#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Key {
  Up,
  Down,
  Left,
  Right,
  A,
  B,
  Start,
  Select,
}

impl Key {
  fn index(self) -> usize {
    self as usize
  }

  /// Bit in the P1 low nibble, within the key's group.
  fn mask(self) -> u8 {
    match self {
      Key::Right | Key::A => 0x1,
      Key::Left | Key::B => 0x2,
      Key::Up | Key::Select => 0x4,
      Key::Down | Key::Start => 0x8,
    }
  }

  fn is_direction(self) -> bool {
    match self {
      Key::Up | Key::Down | Key::Left | Key::Right => true,
      _ => false,
    }
  }
}

const KEYS: [Key; 8] = [
  Key::Up,
  Key::Down,
  Key::Left,
  Key::Right,
  Key::A,
  Key::B,
  Key::Start,
  Key::Select,
];

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Group {
  Direction,
  Buttons,
}

/// Key state behind P1. The nibble is computed on read from the held keys
/// and the last group selection.
#[derive(Debug)]
pub struct KeyData {
  down: [bool; 8],
  group: Group,
}

impl KeyData {
  pub fn new() -> KeyData {
    KeyData {
      down: [false; 8],
      group: Group::Buttons,
    }
  }

  /// P1 as seen by the CPU: the stored upper bits with the low nibble
  /// replaced by the selected group, 0 meaning pressed.
  pub fn rb(&self, latched: u8) -> u8 {
    let mut nibble = 0x0f;
    for key in KEYS.iter() {
      let selected = key.is_direction() == (self.group == Group::Direction);
      if selected && self.down[key.index()] {
        nibble &= !key.mask();
      }
    }
    (latched & 0xf0) | nibble
  }

  /// Select a group. A low bit 4 picks the directions, a low bit 5 the
  /// buttons; with both low the buttons win.
  pub fn wb(&mut self, value: u8) {
    if value & 0x10 == 0 {
      debug!("P1 (Joypad) selected direction keys");
      self.group = Group::Direction;
    }
    if value & 0x20 == 0 {
      debug!("P1 (Joypad) selected button keys");
      self.group = Group::Buttons;
    }
  }

  pub fn key_down(&mut self, key: Key) {
    self.down[key.index()] = true;
    debug!("Pressed {:?}. Key = {:?}", key, &self);
  }

  pub fn key_up(&mut self, key: Key) {
    self.down[key.index()] = false;
    debug!("Released {:?}. Key = {:?}", key, &self);
  }
}
