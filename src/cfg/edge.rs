//! Control flow edge kinds.
//!
//! The dominator computation ignores edge kinds; they are carried so that a
//! rendered flowgraph shows which branch of a conditional or switch each
//! edge is.

/// The kind of control transfer an edge represents.
///
/// # Examples
///
/// ```rust
/// use cfgdom::cfg::CfgEdgeKind;
///
/// let edge_kind = CfgEdgeKind::ConditionalTrue;
/// assert!(edge_kind.is_conditional());
/// assert_eq!(edge_kind.label(), "true");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CfgEdgeKind {
    /// Unconditional jump or fall-through into the next block.
    #[default]
    Unconditional,

    /// The taken branch of a conditional jump.
    ConditionalTrue,

    /// The fall-through branch of a conditional jump.
    ConditionalFalse,

    /// A switch (table jump) target.
    Switch {
        /// The case value that selects this edge, or `None` for the default case.
        case_value: Option<i32>,
    },
}

impl CfgEdgeKind {
    /// Returns `true` for [`ConditionalTrue`](Self::ConditionalTrue) and
    /// [`ConditionalFalse`](Self::ConditionalFalse).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgdom::cfg::CfgEdgeKind;
    ///
    /// assert!(CfgEdgeKind::ConditionalTrue.is_conditional());
    /// assert!(CfgEdgeKind::ConditionalFalse.is_conditional());
    /// assert!(!CfgEdgeKind::Unconditional.is_conditional());
    /// ```
    #[must_use]
    pub const fn is_conditional(&self) -> bool {
        matches!(self, Self::ConditionalTrue | Self::ConditionalFalse)
    }

    /// Returns `true` for [`Switch`](Self::Switch) edges.
    #[must_use]
    pub const fn is_switch(&self) -> bool {
        matches!(self, Self::Switch { .. })
    }

    /// Returns the short label used when rendering the edge; empty for
    /// unconditional edges.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Unconditional => String::new(),
            Self::ConditionalTrue => "true".to_string(),
            Self::ConditionalFalse => "false".to_string(),
            Self::Switch { case_value } => {
                case_value.map_or("default".to_string(), |v| format!("case {v}"))
            }
        }
    }

    /// Returns the Graphviz color of the edge.
    pub(crate) const fn color(&self) -> &'static str {
        match self {
            Self::Unconditional => "black",
            Self::ConditionalTrue => "green",
            Self::ConditionalFalse => "red",
            Self::Switch { .. } => "blue",
        }
    }
}
