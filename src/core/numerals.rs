const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "quintillion"),
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Standalone roman numerals recognised in titles, as digit strings
pub fn roman_digits(token: &str) -> Option<&'static str> {
    let digits = match token {
        "i" => "1",
        "ii" => "2",
        "iii" => "3",
        "iv" => "4",
        "v" => "5",
        "vi" => "6",
        "vii" => "7",
        "viii" => "8",
        "ix" => "9",
        "x" => "10",
        _ => return None,
    };
    Some(digits)
}

/// Spell a run of ASCII digits as cardinal words
///
/// Follows the plain English scheme without "and" (`2009` -> `two thousand nine`),
/// words joined by single spaces.
pub fn cardinal_words(digits: &str) -> String {
    number_words(digits).join(" ")
}

/// Spell a run of ASCII digits as ordinal words (`21` -> `twenty first`)
pub fn ordinal_words(digits: &str) -> String {
    let mut words: Vec<String> = number_words(digits).into_iter().map(String::from).collect();
    if let Some(last) = words.last_mut() {
        *last = make_ordinal(last);
    }
    words.join(" ")
}

fn number_words(digits: &str) -> Vec<&'static str> {
    match digits.parse::<u64>() {
        Ok(n) => words_for(n),
        // Longer than u64: spell digit by digit
        Err(_) => digits
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| ONES[usize::from(b - b'0')])
            .collect(),
    }
}

fn words_for(n: u64) -> Vec<&'static str> {
    if n == 0 {
        return vec![ONES[0]];
    }

    let mut words = Vec::new();
    let mut rest = n;

    for &(scale, name) in SCALES.iter() {
        if rest >= scale {
            push_below_thousand(rest / scale, &mut words);
            words.push(name);
            rest %= scale;
        }
    }

    if rest > 0 {
        push_below_thousand(rest, &mut words);
    }

    words
}

fn push_below_thousand(n: u64, words: &mut Vec<&'static str>) {
    // n < 1000 always: the largest multiplier is u64::MAX / 10^18 = 18
    let hundreds = (n / 100) as usize;
    let rest = (n % 100) as usize;

    if hundreds > 0 {
        words.push(ONES[hundreds]);
        words.push("hundred");
    }

    if rest >= 20 {
        words.push(TENS[rest / 10]);
        if rest % 10 > 0 {
            words.push(ONES[rest % 10]);
        }
    } else if rest > 0 {
        words.push(ONES[rest]);
    }
}

fn make_ordinal(word: &str) -> String {
    match word {
        "one" => "first".to_string(),
        "two" => "second".to_string(),
        "three" => "third".to_string(),
        "five" => "fifth".to_string(),
        "eight" => "eighth".to_string(),
        "nine" => "ninth".to_string(),
        "twelve" => "twelfth".to_string(),
        w if w.ends_with('y') => format!("{}ieth", &w[..w.len() - 1]),
        w => format!("{}th", w),
    }
}
