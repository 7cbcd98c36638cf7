/// Minimum valid year (inclusive)
pub const MIN_YEAR: u16 = 1;
/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of any month
pub const MIN_DAY: u8 = 1;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// English month names used by the `long` presentation style (index 0 unused)
pub const MONTH_NAMES: [&str; 13] = [
    "",
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Component separator of the storage format (`YYYY-MM-DD`)
pub const STORAGE_SEPARATOR: char = '-';
/// Component separator of the `short` presentation style (`YYYY/MM/DD`)
pub const SHORT_SEPARATOR: char = '/';
/// Range separator used by the string form of a `DateRange`
pub const RANGE_SEPARATOR: char = '/';

/// Digit counts of the storage format: year, month, day
pub(crate) const STORAGE_WIDTHS: [usize; 3] = [4, 2, 2];

/// Keyword resolving to the visitor's current date
pub const KEYWORD_CURRENT: &str = "current";
/// Keyword resolving to the site-wide default date
pub const KEYWORD_DEFAULT: &str = "default";
/// Keyword resolving to the earliest defined date
pub const KEYWORD_FIRST: &str = "first";
/// Keyword resolving to the latest defined date
pub const KEYWORD_LAST: &str = "last";
