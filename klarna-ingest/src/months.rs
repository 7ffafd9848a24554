//! German month names as they appear in Klarna exports.
//!
//! Kept as data rather than a locale lookup so results never depend on the host.

const MONTHS: [(&str, u32); 12] = [
    ("Jan.", 1),
    ("Feb.", 2),
    ("März", 3),
    ("Apr.", 4),
    ("Mai", 5),
    ("Juni", 6),
    ("Juli", 7),
    ("Aug.", 8),
    ("Sept.", 9),
    ("Okt.", 10),
    ("Nov.", 11),
    ("Dez.", 12),
];

/// Month number (1-12) for a name exactly as listed in the table.
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, number)| *number)
}
