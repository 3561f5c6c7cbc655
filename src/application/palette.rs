// Series colors
use std::collections::BTreeMap;

const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const FALLBACK_COLOR: &str = "#7f7f7f";

/// Colors assigned by sorted username, cycling through the categorical scheme.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: BTreeMap<String, String>,
}

impl Palette {
    pub fn for_usernames<'a>(usernames: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sorted: Vec<&str> = usernames.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();

        let colors = sorted
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), CATEGORY10[i % CATEGORY10.len()].to_string()))
            .collect();
        Self { colors }
    }

    pub fn color(&self, username: &str) -> &str {
        self.colors
            .get(username)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_ignores_input_order() {
        let a = Palette::for_usernames(["bob", "alice", "bob"]);
        let b = Palette::for_usernames(["alice", "bob"]);

        assert_eq!(a, b);
        assert_eq!(a.color("alice"), "#1f77b4");
        assert_eq!(a.color("bob"), "#ff7f0e");
        assert_eq!(a.color("nobody"), FALLBACK_COLOR);
    }
}
