//! SGR (Select Graphic Rendition), `CSI ... m`.
//!
//! [`GraphicsRendition::update_with_csi_params`] applies a parsed param
//! list on top of an existing rendition. [`GraphicsRendition::as_csi_params`]
//! is the inverse direction: given an optional previous rendition, it emits
//! only the parameters that changed, so the caller never re-sends the full
//! attribute set on every write. Colors are each split into their own
//! parameter group so a single CSI never needs more than 16 parameters.

use crate::feature::Feature;
use crate::param::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Palette(u8),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    None,
    Bold,
    Dim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlinkMode {
    #[default]
    None,
    Normal,
    Rapid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderlineMode {
    #[default]
    None,
    Normal,
    Double,
    Curly,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphicsRendition {
    pub font_weight: FontWeight,
    pub italic: bool,
    pub underline_mode: UnderlineMode,
    pub underline_color: Color,
    pub blink_mode: BlinkMode,
    pub inverted: bool,
    pub invisible: bool,
    pub strike_through: bool,
    pub overline: bool,
    pub fg: Color,
    pub bg: Color,
}

/// Parses `38;2;R;G;B`, `38:2:R:G:B`, `38:2:CS:R:G:B` (color-space ignored),
/// `38;5;I` and `38:5:I` (and the `48`/`58` equivalents). Returns the
/// number of top-level parameter groups consumed, starting at `start`, and
/// the parsed color (the default color on any malformed form).
fn parse_complex_color(params: &Params, start: usize) -> (usize, Color) {
    let subparams = params.subparams(start);
    if subparams.len() <= 1 {
        // Legacy `;`-separated form: the colorspace selector and channel
        // values are each their own top-level parameter group.
        match params.get(start + 1, 0) {
            2 => {
                if params.size().saturating_sub(start) < 5 {
                    return (1, Color::default());
                }
                (
                    5,
                    Color::Rgb(
                        params.get(start + 2, 0) as u8,
                        params.get(start + 3, 0) as u8,
                        params.get(start + 4, 0) as u8,
                    ),
                )
            }
            5 => {
                if params.size().saturating_sub(start) < 3 {
                    return (1, Color::default());
                }
                let index = params.get(start + 2, 0);
                if index >= 256 {
                    (3, Color::default())
                } else {
                    (3, Color::Palette(index as u8))
                }
            }
            _ => (1, Color::default()),
        }
    } else {
        let sub = |i: usize| subparams.get(i).copied().flatten().unwrap_or(0);
        match sub(1) {
            2 => {
                if subparams.len() != 5 && subparams.len() != 6 {
                    return (1, Color::default());
                }
                let n = subparams.len();
                (1, Color::Rgb(sub(n - 3) as u8, sub(n - 2) as u8, sub(n - 1) as u8))
            }
            5 => {
                let index = sub(2);
                if index >= 256 {
                    (1, Color::default())
                } else {
                    (1, Color::Palette(index as u8))
                }
            }
            _ => (1, Color::default()),
        }
    }
}

/// Dispatches any fg/bg/underline color specifier: complex (`38`/`48`/`58`)
/// or one of the fixed 8+8 palette codes.
fn parse_color(params: &Params, start: usize) -> (usize, Color) {
    let command = params.get(start, 0);
    if command == 38 || command == 48 || command == 58 {
        return parse_complex_color(params, start);
    }

    let palette_index = command % 10;
    if command >= 90 {
        return (1, Color::Palette(8 + palette_index as u8));
    }
    if palette_index == 9 {
        return (1, Color::default());
    }
    (1, Color::Palette(palette_index as u8))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorSlot {
    Fg,
    Bg,
    Underline,
}

fn color_to_params(c: Color, slot: ColorSlot, use_legacy: bool) -> Params {
    let mut params = Params::default();
    match c {
        Color::Rgb(r, g, b) => {
            let code = match slot {
                ColorSlot::Fg => 38,
                ColorSlot::Bg => 48,
                ColorSlot::Underline => 58,
            };
            params.append_parameter(Some(code));
            if slot == ColorSlot::Underline || !use_legacy {
                // Underline color isn't constrained by backwards
                // compatibility, so it always uses the sub-parameter form
                // with an empty color-space slot: `code:2::r:g:b`.
                params.append_subparameter(Some(2));
                params.append_subparameter(None);
                params.append_subparameter(Some(r as u32));
                params.append_subparameter(Some(g as u32));
                params.append_subparameter(Some(b as u32));
            } else {
                params.append_parameter(Some(2));
                params.append_parameter(Some(r as u32));
                params.append_parameter(Some(g as u32));
                params.append_parameter(Some(b as u32));
            }
        }
        Color::Default => {
            let code = match slot {
                ColorSlot::Fg => 39,
                ColorSlot::Bg => 49,
                ColorSlot::Underline => 59,
            };
            params.append_parameter(Some(code));
        }
        Color::Palette(index) => {
            if slot == ColorSlot::Underline {
                params.append_parameter(Some(58));
                params.append_subparameter(Some(5));
                params.append_subparameter(Some(index as u32));
            } else if index < 8 {
                let base = if slot == ColorSlot::Fg { 30 } else { 40 };
                params.append_parameter(Some(base + index as u32));
            } else if index < 16 {
                let base = if slot == ColorSlot::Fg { 90 } else { 100 };
                params.append_parameter(Some(base + (index as u32 - 8)));
            } else {
                let base = if slot == ColorSlot::Fg { 38 } else { 48 };
                params.append_parameter(Some(base));
                if use_legacy {
                    params.append_parameter(Some(5));
                    params.append_parameter(Some(index as u32));
                } else {
                    params.append_subparameter(Some(5));
                    params.append_subparameter(Some(index as u32));
                }
            }
        }
    }
    params
}

impl GraphicsRendition {
    /// Applies one `CSI ... m` param list on top of the current rendition.
    /// An empty param list (`CSI m`) resets everything, same as `CSI 0 m`.
    pub fn update_with_csi_params(&mut self, params: &Params) {
        if params.is_empty() {
            *self = Self::default();
            return;
        }

        let mut i = 0usize;
        while i < params.size() {
            match params.get(i, 0) {
                0 => *self = Self::default(),
                1 => self.font_weight = FontWeight::Bold,
                2 => self.font_weight = FontWeight::Dim,
                3 => self.italic = true,
                4 => {
                    self.underline_mode = match params.get_subparam(i, 1, 1) {
                        0 => UnderlineMode::None,
                        1 => UnderlineMode::Normal,
                        2 => UnderlineMode::Double,
                        3 => UnderlineMode::Curly,
                        4 => UnderlineMode::Dotted,
                        5 => UnderlineMode::Dashed,
                        _ => self.underline_mode,
                    };
                }
                5 => self.blink_mode = BlinkMode::Normal,
                6 => self.blink_mode = BlinkMode::Rapid,
                7 => self.inverted = true,
                8 => self.invisible = true,
                9 => self.strike_through = true,
                21 => self.underline_mode = UnderlineMode::Double,
                22 => self.font_weight = FontWeight::None,
                23 => self.italic = false,
                24 => self.underline_mode = UnderlineMode::None,
                25 => self.blink_mode = BlinkMode::None,
                27 => self.inverted = false,
                28 => self.invisible = false,
                29 => self.strike_through = false,
                30..=39 | 90..=97 => {
                    let (n, c) = parse_color(params, i);
                    i += n - 1;
                    self.fg = c;
                }
                40..=49 | 100..=107 => {
                    let (n, c) = parse_color(params, i);
                    i += n - 1;
                    self.bg = c;
                }
                53 => self.overline = true,
                55 => self.overline = false,
                58 | 59 => {
                    let (n, c) = parse_color(params, i);
                    i += n - 1;
                    self.underline_color = c;
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Produces the parameter groups needed to transform `prev` (or the
    /// default rendition, if `prev` is `None`) into `self`. Each returned
    /// `Params` is meant to be serialized as its own `CSI ... m` sequence;
    /// splitting keeps any single sequence well under the 16-parameter
    /// limit.
    pub fn as_csi_params(&self, features: Feature, prev: Option<&GraphicsRendition>) -> Vec<Params> {
        let mut result = Vec::new();
        let mut basic = Params::default();
        if prev.is_none() {
            basic.append_parameter(Some(0));
        }

        let compare = prev.copied().unwrap_or_default();

        if compare.font_weight != self.font_weight {
            match self.font_weight {
                FontWeight::Bold => basic.append_parameter(Some(1)),
                FontWeight::Dim => basic.append_parameter(Some(2)),
                FontWeight::None => basic.append_parameter(Some(22)),
            }
        }
        if compare.italic != self.italic {
            basic.append_parameter(Some(if self.italic { 3 } else { 23 }));
        }
        if compare.blink_mode != self.blink_mode {
            match self.blink_mode {
                BlinkMode::Normal => basic.append_parameter(Some(5)),
                BlinkMode::Rapid => basic.append_parameter(Some(6)),
                BlinkMode::None => basic.append_parameter(Some(25)),
            }
        }
        if compare.inverted != self.inverted {
            basic.append_parameter(Some(if self.inverted { 7 } else { 27 }));
        }
        if compare.invisible != self.invisible {
            basic.append_parameter(Some(if self.invisible { 8 } else { 28 }));
        }
        if compare.strike_through != self.strike_through {
            basic.append_parameter(Some(if self.strike_through { 9 } else { 29 }));
        }
        if compare.overline != self.overline {
            basic.append_parameter(Some(if self.overline { 53 } else { 55 }));
        }

        if compare.underline_mode != self.underline_mode {
            let undercurl = features.contains(Feature::UNDERCURL);
            match self.underline_mode {
                UnderlineMode::Normal => basic.append_parameter(Some(4)),
                UnderlineMode::Double => basic.append_parameter(Some(21)),
                UnderlineMode::Curly => {
                    if undercurl {
                        let mut p = Params::default();
                        p.append_parameter(Some(4));
                        p.append_subparameter(Some(3));
                        result.push(p);
                    } else {
                        basic.append_parameter(Some(4));
                    }
                }
                UnderlineMode::Dotted => {
                    if undercurl {
                        let mut p = Params::default();
                        p.append_parameter(Some(4));
                        p.append_subparameter(Some(4));
                        result.push(p);
                    } else {
                        basic.append_parameter(Some(4));
                    }
                }
                UnderlineMode::Dashed => {
                    if undercurl {
                        let mut p = Params::default();
                        p.append_parameter(Some(4));
                        p.append_subparameter(Some(5));
                        result.push(p);
                    } else {
                        basic.append_parameter(Some(4));
                    }
                }
                UnderlineMode::None => basic.append_parameter(Some(24)),
            }
        }

        result.insert(0, basic);

        // Split each color into its own parameter group, and use legacy
        // `;`-joined true-color sequences unless the consumer supports
        // undercurl (and therefore the `:` sub-parameter form in general).
        let use_legacy = !features.contains(Feature::UNDERCURL);
        if compare.fg != self.fg {
            result.push(color_to_params(self.fg, ColorSlot::Fg, use_legacy));
        }
        if compare.bg != self.bg {
            result.push(color_to_params(self.bg, ColorSlot::Bg, use_legacy));
        }
        if compare.underline_color != self.underline_color {
            result.push(color_to_params(self.underline_color, ColorSlot::Underline, use_legacy));
        }

        result.retain(|p| !p.is_empty());
        result
    }

    /// [`Self::as_csi_params`] rendered as complete `CSI ... m` sequences.
    pub fn as_csi_sequences(&self, features: Feature, prev: Option<&GraphicsRendition>) -> Vec<String> {
        self.as_csi_params(features, prev)
            .iter()
            .map(|p| format!("\x1b[{}m", p.to_csi_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_on_empty_params() {
        let mut gr = GraphicsRendition {
            italic: true,
            ..Default::default()
        };
        gr.update_with_csi_params(&Params::default());
        assert_eq!(gr, GraphicsRendition::default());
    }

    #[test]
    fn parses_legacy_true_color_fg() {
        let mut gr = GraphicsRendition::default();
        gr.update_with_csi_params(&Params::from_str("38;2;120;200;255"));
        assert_eq!(gr.fg, Color::Rgb(120, 200, 255));
    }

    #[test]
    fn parses_subparam_true_color_with_ignored_colorspace() {
        let mut gr = GraphicsRendition::default();
        gr.update_with_csi_params(&Params::from_str("38:2:0:120:200:255"));
        assert_eq!(gr.fg, Color::Rgb(120, 200, 255));
    }

    #[test]
    fn parses_indexed_color() {
        let mut gr = GraphicsRendition::default();
        gr.update_with_csi_params(&Params::from_str("48;5;200"));
        assert_eq!(gr.bg, Color::Palette(200));
    }

    #[test]
    fn out_of_range_palette_index_is_default() {
        let mut gr = GraphicsRendition::default();
        gr.update_with_csi_params(&Params::from_str("38:5:400"));
        assert_eq!(gr.fg, Color::Default);
    }

    #[test]
    fn curly_underline_round_trip_subparam() {
        let mut gr = GraphicsRendition::default();
        gr.update_with_csi_params(&Params::from_str("4:3"));
        assert_eq!(gr.underline_mode, UnderlineMode::Curly);
    }

    #[test]
    fn double_underline_alias_21() {
        let mut gr = GraphicsRendition::default();
        gr.update_with_csi_params(&Params::from_str("21"));
        assert_eq!(gr.underline_mode, UnderlineMode::Double);
    }

    #[test]
    fn delta_serialization_only_emits_changes() {
        let prev = GraphicsRendition {
            italic: true,
            ..Default::default()
        };
        let cur = GraphicsRendition {
            italic: true,
            fg: Color::Rgb(1, 2, 3),
            ..Default::default()
        };
        let params = cur.as_csi_params(Feature::empty(), Some(&prev));
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].to_csi_string(), "38;2;1;2;3");
    }

    #[test]
    fn delta_serialization_applies_back_to_cur() {
        let prev = GraphicsRendition::default();
        let cur = GraphicsRendition {
            italic: true,
            bg: Color::Palette(9),
            ..Default::default()
        };
        for params in cur.as_csi_params(Feature::UNDERCURL, Some(&prev)) {
            let mut applied = prev;
            applied.update_with_csi_params(&params);
        }
        // Each delta group applies independently on top of `prev`; verify
        // the italic group round-trips (colors are asserted separately
        // above since they land in their own sequence).
        let mut applied = prev;
        for params in cur.as_csi_params(Feature::UNDERCURL, Some(&prev)) {
            applied.update_with_csi_params(&params);
        }
        assert_eq!(applied, cur);
    }

    #[test]
    fn never_exceeds_sixteen_params_per_sequence() {
        let cur = GraphicsRendition {
            fg: Color::Rgb(1, 2, 3),
            bg: Color::Rgb(4, 5, 6),
            underline_color: Color::Rgb(7, 8, 9),
            italic: true,
            inverted: true,
            ..Default::default()
        };
        for seq in cur.as_csi_sequences(Feature::UNDERCURL, None) {
            let params = &seq[2..seq.len() - 1];
            assert!(params.split(';').count() <= 16, "{seq}");
        }
    }
}
