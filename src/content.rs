//! Fixed copy and decorations shown on the screens.

/// Loading screen status line, typed out one character at a time.
pub const LOADING_TEXT: &str = "Loading your winter gift...";

pub const LOADING_GREETING: &str = "Merry Christmas 🎅";

/// Sealed screen closing line, typed out one character at a time.
pub const SEALED_TEXT: &str = "Always & Forever ❄️ 🤍";

/// The 3x3 board on the game screen. The centre cell is the target.
pub const GRID: [&str; 9] = ["🍫", "🍬", "🍭", "🍩", "🍪", "🧁", "🍫", "🍬", "🍭"];

/// Index of the cookie in [`GRID`].
pub const TARGET_CELL: usize = 4;

/// Sweets thrown out of the cookie when it is tapped.
pub const BURST: [&str; 5] = ["🍬", "🍭", "🍫", "🧁", "🍩"];

/// A flip-card: a short line on the front, a note on the back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub front: &'static str,
    pub front_emoji: &'static str,
    pub back_title: &'static str,
    pub back_text: &'static str,
    pub back_emoji: &'static str,
}

pub const CARDS: [Card; 3] = [
    Card {
        front: "You make everything feel warmer",
        front_emoji: "🤍",
        back_title: "Christmas Feeling:",
        back_text: "Being with you feels like comfort and calm.",
        back_emoji: "🎄",
    },
    Card {
        front: "You're cute even when you're annoyed",
        front_emoji: "😅",
        back_title: "Winter Observation:",
        back_text: "No matter the mood, you're still my favorite.",
        back_emoji: "❤️",
    },
    Card {
        front: "Christmas Coupon: Unlimited hugs",
        front_emoji: "🫂🫂",
        back_title: "Redeem Anytime",
        back_text: "Especially on cold days",
        back_emoji: "forever",
    },
];
