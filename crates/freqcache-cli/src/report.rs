//! Plain-text output for the demo workloads

use std::fmt::Display;

/// Print one `key::value` line per entry
pub fn print_entries<'a, K, V, I>(entries: I)
where
    K: Display + 'a,
    V: Display + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    for (key, value) in entries {
        println!("{}", format_entry(key, value));
    }
}

/// Draw `count` samples and print them under a heading
pub fn print_samples<F>(label: &str, count: usize, mut sample: F)
where
    F: FnMut() -> Option<String>,
{
    println!("\n{} samples from {}:", count, label);
    for _ in 0..count {
        match sample() {
            Some(value) => println!("  {}", value),
            None => {
                println!("  (table is empty)");
                break;
            }
        }
    }
}

fn format_entry(key: &impl Display, value: &impl Display) -> String {
    format!("{}::{}", key, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry() {
        assert_eq!(format_entry(&7, &"value7"), "7::value7");
    }
}
