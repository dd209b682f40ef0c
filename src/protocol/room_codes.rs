use rand::Rng;

use super::types::DEFAULT_ROOM_CODE_LENGTH;

/// Generate a room code: four uniformly random uppercase Latin letters
/// (§6 "Room code format").
pub fn generate_room_code() -> String {
    generate_room_code_of_length(DEFAULT_ROOM_CODE_LENGTH)
}

fn generate_room_code_of_length(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..26u8);
            (b'A' + idx) as char
        })
        .collect()
}

/// Generate a room code guaranteed not to collide with `is_live`. Callers
/// retry with fresh random codes rather than raising an error; collisions
/// are astronomically unlikely at four letters but the contract (§6 "rejected
/// if already live") requires it.
pub fn generate_unique_room_code(is_live: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = generate_room_code();
        if !is_live(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn room_codes_are_four_uppercase_letters() {
        for _ in 0..200 {
            let code = generate_room_code();
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn unique_code_respects_live_set() {
        let mut seen = HashSet::new();
        seen.insert("AAAA".to_string());
        let code = generate_unique_room_code(|c| seen.contains(c));
        assert_ne!(code, "AAAA");
        seen.insert(code);
    }
}
