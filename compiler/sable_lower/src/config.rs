//! Lowering configuration.
//!
//! A [`LowerConfig`] is a plain value: the engine never reads files or the
//! environment. Callers start from [`LowerConfig::default`] and adjust it
//! with the `with_*` builders.

use rustc_hash::FxHashSet;

/// How operators appear in the lowered program.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum OperatorStyle {
    /// `a + b`
    #[default]
    Infix,
    /// `op.add(a, b)`
    ExplicitCall,
}

/// How module-level constants appear in the lowered program.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ConstantStyle {
    /// References are replaced by a copy of the constant's value. The
    /// constant itself stays as a module binding.
    #[default]
    Inline,
    /// Each constant becomes a zero-argument function and references
    /// become calls to it.
    Accessor,
}

/// Names the target environment already uses.
///
/// Its keywords and literal keywords, the numeric constructor names, and the
/// modules and builtin routines emitted code refers to.
pub const DEFAULT_RESERVED_NAMES: &[&str] = &[
    // Keywords
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
    // Literal keywords
    "False", "None", "True",
    // Type constructors
    "bool", "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64", "float32",
    "float64", "str",
    // Modules
    "math", "np", "op",
    // Builtin routines
    "abs", "exit", "print", "round",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LowerConfig {
    pub operator_style: OperatorStyle,
    pub constant_style: ConstantStyle,
    /// Names no lowered declaration may be emitted under.
    pub reserved_names: FxHashSet<String>,
    /// Evaluate operators on literal operands at lowering time.
    pub fold_constants: bool,
    /// Base names of the declarations the program is entered through.
    /// They are never inlined away, and reachability starts from them.
    pub entry_points: FxHashSet<String>,
    /// Replace calls to forwarding functions with calls to what they
    /// forward to.
    pub inline_trivial: bool,
    /// Drop `let` bindings that nothing reads.
    pub trim_locals: bool,
    /// Drop declarations no entry point reaches. Does nothing while
    /// `entry_points` is empty.
    pub remove_unreachable: bool,
}

impl Default for LowerConfig {
    fn default() -> Self {
        LowerConfig {
            operator_style: OperatorStyle::default(),
            constant_style: ConstantStyle::default(),
            reserved_names: DEFAULT_RESERVED_NAMES.iter().map(|s| (*s).to_string()).collect(),
            fold_constants: false,
            entry_points: FxHashSet::default(),
            inline_trivial: false,
            trim_locals: false,
            remove_unreachable: false,
        }
    }
}

impl LowerConfig {
    #[must_use]
    pub fn with_operator_style(mut self, style: OperatorStyle) -> Self {
        self.operator_style = style;
        self
    }

    #[must_use]
    pub fn with_constant_style(mut self, style: ConstantStyle) -> Self {
        self.constant_style = style;
        self
    }

    #[must_use]
    pub fn with_fold_constants(mut self, fold: bool) -> Self {
        self.fold_constants = fold;
        self
    }

    #[must_use]
    pub fn with_entry_points<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry_points = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_inline_trivial(mut self, inline: bool) -> Self {
        self.inline_trivial = inline;
        self
    }

    #[must_use]
    pub fn with_trim_locals(mut self, trim: bool) -> Self {
        self.trim_locals = trim;
        self
    }

    #[must_use]
    pub fn with_remove_unreachable(mut self, remove: bool) -> Self {
        self.remove_unreachable = remove;
        self
    }

    /// Every simplification pass on.
    #[must_use]
    pub fn with_simplify(self, on: bool) -> Self {
        self.with_inline_trivial(on)
            .with_trim_locals(on)
            .with_remove_unreachable(on)
    }

    pub fn is_entry_point(&self, name: &str) -> bool {
        self.entry_points.contains(name)
    }

    /// Replace the reserved set.
    #[must_use]
    pub fn with_reserved_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add names to the reserved set.
    #[must_use]
    pub fn with_extra_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names.contains(name)
    }
}
