//! Ordered list of CSI/DCS parameters with sub-parameters and empty markers.
//!
//! A [`Params`] is an ordered sequence of parameter groups ([`Param`]); each
//! group is an ordered sequence of sub-parameters, separated on the wire by
//! `:` within a group and by `;` between groups. A sub-parameter is either
//! present (`Some(u32)`) or the explicit "empty" marker (`None`), which is
//! how `CSI ;;5m` is distinguished from a parameter simply being absent at
//! the tail.

pub const MAX_PARAMS: usize = 32;
pub const MAX_SUBPARAMS: usize = 32;
pub const PARAM_SEPARATOR: u8 = b';';
pub const SUBPARAM_SEPARATOR: u8 = b':';

/// A single sub-parameter slot: `None` is the explicit empty marker.
pub type Subparam = Option<u32>;

#[derive(Default, Debug, Clone, Copy)]
pub struct Param {
    array: [Subparam; MAX_SUBPARAMS],
    len: usize,
}

impl Param {
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_SUBPARAMS
    }

    pub fn push(&mut self, subparam: Subparam) {
        if self.is_full() {
            log::trace!("dropping sub-parameter {subparam:?}, already at the {MAX_SUBPARAMS}-slot cap");
            return;
        }

        self.array[self.len] = subparam;
        self.len += 1;
    }

    pub fn get(&self, index: usize, default: u32) -> u32 {
        self.array
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(default)
    }

    pub fn to_slice(&self) -> &[Subparam] {
        &self.array[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = Subparam> + '_ {
        self.to_slice().iter().copied()
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct Params {
    array: [Param; MAX_PARAMS],
    len: usize,
}

impl Params {
    pub fn clear(&mut self) {
        for param in self.array[..self.len].iter_mut() {
            param.clear();
        }
        self.len = 0;
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_PARAMS
    }

    /// Starts a new parameter group, whose first sub-parameter is `value`.
    pub fn append_parameter(&mut self, value: Subparam) {
        if self.is_full() {
            log::trace!("dropping parameter group {value:?}, already at the {MAX_PARAMS}-group cap");
            return;
        }
        self.array[self.len] = Param::default();
        self.array[self.len].push(value);
        self.len += 1;
    }

    /// Appends a sub-parameter to the current (last) parameter group.
    ///
    /// Has no effect if no group has been started yet; callers append a
    /// parameter first so there is always a current group to extend.
    pub fn append_subparameter(&mut self, value: Subparam) {
        if self.len == 0 {
            self.append_parameter(value);
            return;
        }
        self.array[self.len - 1].push(value);
    }

    pub fn get(&self, index: usize, default: u32) -> u32 {
        self.array
            .get(index)
            .map(|param| param.get(0, default))
            .unwrap_or(default)
    }

    pub fn get_subparam(&self, index: usize, subindex: usize, default: u32) -> u32 {
        self.array
            .get(index)
            .map(|param| param.get(subindex, default))
            .unwrap_or(default)
    }

    /// A view over the sub-parameters of the group at `index`.
    pub fn subparams(&self, index: usize) -> &[Subparam] {
        self.array
            .get(index)
            .map(|param| param.to_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.array[..self.len].iter()
    }

    /// Renders back to wire form: sub-parameters within a group joined by
    /// `:`, groups joined by `;`. The inverse of [`Params::from_str`].
    pub fn to_csi_string(&self) -> String {
        self.iter()
            .map(|param| {
                param
                    .iter()
                    .map(|sub| sub.map(|v| v.to_string()).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(":")
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Parses a buffer of ASCII digits, `;` and `:` (as accumulated while
    /// scanning a CSI sequence) into a parameter list. Consecutive
    /// separators (or a separator at either end) produce the empty marker.
    pub fn from_str(buf: &str) -> Params {
        let mut params = Params::default();
        if buf.is_empty() {
            return params;
        }

        let mut current = String::new();
        // Whether the token currently being accumulated should be appended
        // as a sub-parameter of the previous group (last separator seen was
        // `:`) rather than starting a new group (last separator was `;`, or
        // this is the first token).
        let mut pending_is_subparam = false;

        let mut flush = |params: &mut Params, current: &mut String, pending_is_subparam: bool| {
            let value = if current.is_empty() {
                None
            } else {
                current.parse::<u32>().ok()
            };
            if pending_is_subparam {
                params.append_subparameter(value);
            } else {
                params.append_parameter(value);
            }
            current.clear();
        };

        for byte in buf.bytes() {
            match byte {
                b'0'..=b'9' => current.push(byte as char),
                PARAM_SEPARATOR => {
                    flush(&mut params, &mut current, pending_is_subparam);
                    pending_is_subparam = false;
                }
                SUBPARAM_SEPARATOR => {
                    flush(&mut params, &mut current, pending_is_subparam);
                    pending_is_subparam = true;
                }
                _ => {}
            }
        }
        flush(&mut params, &mut current, pending_is_subparam);

        params
    }
}
