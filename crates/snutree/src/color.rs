//! Cyclic family color palette.

use std::collections::VecDeque;

/// Graphviz color names handed out to families without an explicit color.
const PALETTE: &[&str] = &[
    "aquamarine",
    "bisque",
    "burlywood",
    "cadetblue",
    "chartreuse",
    "coral",
    "cornflowerblue",
    "darkgoldenrod1",
    "darkolivegreen3",
    "darkorange",
    "darkorchid1",
    "darkseagreen",
    "darkslategray3",
    "deeppink",
    "deepskyblue",
    "dodgerblue",
    "firebrick1",
    "forestgreen",
    "gold",
    "goldenrod",
    "greenyellow",
    "hotpink",
    "indianred1",
    "khaki",
    "lightblue",
    "lightcoral",
    "lightpink",
    "lightsalmon",
    "lightseagreen",
    "lightskyblue",
    "lightslateblue",
    "limegreen",
    "mediumorchid",
    "mediumpurple",
    "mediumseagreen",
    "mediumslateblue",
    "mediumspringgreen",
    "mediumturquoise",
    "olivedrab1",
    "orange",
    "orchid",
    "palegreen",
    "palevioletred",
    "peachpuff",
    "peru",
    "plum",
    "powderblue",
    "rosybrown",
    "royalblue",
    "salmon",
    "sandybrown",
    "seagreen2",
    "sienna1",
    "skyblue",
    "slateblue1",
    "springgreen",
    "steelblue1",
    "tan",
    "thistle",
    "tomato",
    "turquoise",
    "violet",
    "wheat",
    "yellowgreen",
];

/// Hands out colors in rotation, preferring colors nobody has claimed.
///
/// Claiming a color with [`ColorPicker::use_color`] moves it to the back of
/// the rotation. Drawing with [`ColorPicker::next_color`] takes the front
/// color and moves it to the back, so the palette never runs out.
#[derive(Debug, Clone)]
pub(crate) struct ColorPicker {
    colors: VecDeque<String>,
}

impl ColorPicker {
    pub(crate) fn new<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            colors: colors.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in Graphviz palette.
    pub(crate) fn graphviz() -> Self {
        Self::new(PALETTE.iter().copied())
    }

    /// Marks `color` as taken. Colors outside the palette are ignored.
    pub(crate) fn use_color(&mut self, color: &str) {
        let Some(position) = self.colors.iter().position(|c| c == color) else {
            return;
        };
        if let Some(taken) = self.colors.remove(position) {
            self.colors.push_back(taken);
        }
    }

    /// Draws the next color in the rotation.
    pub(crate) fn next_color(&mut self) -> Option<String> {
        let color = self.colors.pop_front()?;
        self.colors.push_back(color.clone());
        Some(color)
    }

    #[cfg(test)]
    fn colors(&self) -> Vec<&str> {
        self.colors.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_moves_color_to_back() {
        let mut picker = ColorPicker::new(["1", "2", "3", "4", "5"]);

        picker.use_color("3");
        assert_eq!(picker.colors(), ["1", "2", "4", "5", "3"]);

        picker.use_color("3");
        assert_eq!(picker.colors(), ["1", "2", "4", "5", "3"]);

        assert_eq!(picker.next_color().as_deref(), Some("1"));
        assert_eq!(picker.next_color().as_deref(), Some("2"));
        assert_eq!(picker.colors(), ["4", "5", "3", "1", "2"]);
    }

    #[test]
    fn test_use_unknown_color() {
        let mut picker = ColorPicker::new(["1", "2", "3", "4", "5"]);
        picker.use_color("6");
        assert_eq!(picker.colors(), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_palette_cycles() {
        let mut picker = ColorPicker::graphviz();
        let first = picker.next_color();

        for _ in 1..PALETTE.len() {
            assert!(picker.next_color().is_some());
        }
        assert_eq!(picker.next_color(), first);
    }

    #[test]
    fn test_empty_picker() {
        let mut picker = ColorPicker::new(Vec::<String>::new());
        assert_eq!(picker.next_color(), None);
    }
}
