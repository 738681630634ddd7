use vtx_macros::AllVariants;

const KEY_TO_CHAR_MAP_LEN: usize = Key::ALL_VARIANTS.len();
const KEY_TO_CHAR_MAP: [Option<char>; KEY_TO_CHAR_MAP_LEN] = build_key_to_char_map();

const fn build_key_to_char_map() -> [Option<char>; KEY_TO_CHAR_MAP_LEN] {
    let mut map = [None; KEY_TO_CHAR_MAP_LEN];

    use Key::*;

    macro_rules! set {
        ($key:ident $ch:literal) => {
            map[$key as usize] = Some($ch)
        };
    }

    set!(A 'a');
    set!(B 'b');
    set!(C 'c');
    set!(D 'd');
    set!(E 'e');
    set!(F 'f');
    set!(G 'g');
    set!(H 'h');
    set!(I 'i');
    set!(J 'j');
    set!(K 'k');
    set!(L 'l');
    set!(M 'm');
    set!(N 'n');
    set!(O 'o');
    set!(P 'p');
    set!(Q 'q');
    set!(R 'r');
    set!(S 's');
    set!(T 't');
    set!(U 'u');
    set!(V 'v');
    set!(W 'w');
    set!(X 'x');
    set!(Y 'y');
    set!(Z 'z');
    set!(Zero '0');
    set!(One '1');
    set!(Two '2');
    set!(Three '3');
    set!(Four '4');
    set!(Five '5');
    set!(Six '6');
    set!(Seven '7');
    set!(Eight '8');
    set!(Nine '9');
    set!(Semicolon ';');
    set!(Space ' ');
    set!(Apostrophe '\'');
    set!(Comma ',');
    set!(GraveAccent '`');
    set!(Period '.');
    set!(Slash '/');
    set!(Minus '-');
    set!(Plus '+');
    set!(Equal '=');
    set!(LeftBracket '[');
    set!(RightBracket ']');
    set!(Backslash '\\');

    set!(Tab '\t');

    set!(KP0 '0');
    set!(KP1 '1');
    set!(KP2 '2');
    set!(KP3 '3');
    set!(KP4 '4');
    set!(KP5 '5');
    set!(KP6 '6');
    set!(KP7 '7');
    set!(KP8 '8');
    set!(KP9 '9');
    set!(KPDecimal '.');
    set!(KPDivide '/');
    set!(KPMultiply '*');
    set!(KPSubtract '-');
    set!(KPAdd '+');
    set!(KPEqual '=');

    map
}

/// Keyboard events carry a type distinguishing first-press from OS-level
/// auto-repeat from release, independent of any held modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    Press,
    Repeat,
    Release,
}

/// Roughly the union of keys a physical keyboard and the Kitty keyboard
/// protocol's functional-key range can name. `Invalid` stands in for the
/// original's "no specific key" sentinel, used when only Unicode text was
/// produced.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, AllVariants, Debug)]
pub enum Key {
    Invalid,

    // a-z
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // numbers
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,

    // punctuation
    Semicolon,
    Space,
    Apostrophe,
    Comma,
    GraveAccent, // `
    Period,
    Slash,
    Minus,
    Plus,
    Equal,
    LeftBracket,  // [
    RightBracket, // ]
    Backslash,    // \

    // control
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    Insert,
    Delete,
    CapsLock,
    ScrollLock,
    NumLock,
    PageUp,
    PageDown,
    Escape,
    Enter,
    Tab,
    Backspace,
    PrintScreen,
    Pause,
    Menu,

    // function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
    F25,
    F26,
    F27,
    F28,
    F29,
    F30,
    F31,
    F32,
    F33,
    F34,

    // keypad
    KP0,
    KP1,
    KP2,
    KP3,
    KP4,
    KP5,
    KP6,
    KP7,
    KP8,
    KP9,
    KPDecimal,
    KPDivide,
    KPMultiply,
    KPSubtract,
    KPAdd,
    KPEnter,
    KPEqual,
    KPSeparator,
    KPLeft,
    KPRight,
    KPUp,
    KPDown,
    KPPageUp,
    KPPageDown,
    KPHome,
    KPEnd,
    KPInsert,
    KPDelete,
    KPBegin,

    // media
    MediaPlay,
    MediaPause,
    MediaPlayPause,
    MediaReverse,
    MediaStop,
    MediaFastForward,
    MediaRewind,
    MediaTrackNext,
    MediaTrackPrevious,
    MediaRecord,
    LowerVolume,
    RaiseVolume,
    MuteVolume,

    // modifiers
    LeftShift,
    LeftControl,
    LeftAlt,
    LeftSuper,
    LeftHyper,
    LeftMeta,
    RightShift,
    RightControl,
    RightAlt,
    RightSuper,
    RightHyper,
    RightMeta,
    IsoLevel3Shift,
    IsoLevel5Shift,
}

impl Key {
    #[inline]
    pub const fn is_printable(self) -> bool {
        self.char().is_some()
    }

    #[inline]
    pub const fn char(self) -> Option<char> {
        KEY_TO_CHAR_MAP[self as usize]
    }

    #[inline]
    pub const fn is_keypad(self) -> bool {
        use Key::*;

        matches!(
            self,
            KP0 | KP1
                | KP2
                | KP3
                | KP4
                | KP5
                | KP6
                | KP7
                | KP8
                | KP9
                | KPDecimal
                | KPDivide
                | KPMultiply
                | KPSubtract
                | KPAdd
                | KPEnter
                | KPEqual
                | KPSeparator
                | KPLeft
                | KPRight
                | KPUp
                | KPDown
                | KPPageUp
                | KPPageDown
                | KPHome
                | KPEnd
                | KPInsert
                | KPDelete
                | KPBegin
        )
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mods: u8 {
        const SHIFT     = 1 << 0;
        const ALT       = 1 << 1;
        const CONTROL   = 1 << 2;
        const SUPER     = 1 << 3;
        const HYPER     = 1 << 4;
        const META      = 1 << 5;
        const CAPS_LOCK = 1 << 6;
        const NUM_LOCK  = 1 << 7;
    }
}

/// A single decoded keyboard input: which key, what kind of press, which
/// modifiers were held, and any text it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub action: Action,
    pub key: Key,
    pub mods: Mods,
    pub text: String,
}

impl KeyEvent {
    pub fn key_down(key: Key, text: impl Into<String>, mods: Mods) -> Self {
        Self {
            action: Action::Press,
            key,
            mods,
            text: text.into(),
        }
    }
}
