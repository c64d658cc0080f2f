#![forbid(unsafe_code)]

//! Break-opportunity rules and their interpreter.
//!
//! A [`BreakRule`] names a position pattern — break *before* members of a
//! class set, *after* them, or at the edge of a *run* of them — plus any
//! number of context guards. A [`RuleSet`] is an ordered disjunction of
//! rules over a compiled class table: a position between two code points is
//! a break opportunity when at least one rule matches there. Rules carry no
//! state, so evaluation order never changes the break-position set.
//!
//! Two builtin sets exist. The advanced set carries the full contextual
//! CJK/punctuation behavior; the simplified set drops every guard and is
//! the degradation target when compilation of the advanced set fails.
//!
//! # Example
//! ```
//! use scrawl_text::rules::RuleSet;
//!
//! let rules = RuleSet::advanced().expect("builtin rules compile");
//! let masks: Vec<_> = "a b".chars().map(|c| rules.classify(c)).collect();
//! assert!(rules.is_break(masks[0], masks[1])); // before the space
//! assert!(rules.is_break(masks[1], masks[2])); // after the space
//! ```

use smallvec::SmallVec;

use crate::classes::{
    BUILTIN_CLASSES, CharClassTable, ClassDef, ClassId, ClassSet, ClassTableError,
};

/// Context guard refining where a rule may fire.
///
/// `prev` is the code point before the candidate position, `next` the one
/// after. For run-edge rules these are exactly the characters adjacent to
/// the run, so "preceded" reads as "preceded the run".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The previous code point must not belong to the set.
    NotPrecededBy(ClassSet),
    /// The next code point must not belong to the set.
    NotFollowedBy(ClassSet),
    /// The previous code point must belong to the set.
    PrecededBy(ClassSet),
    /// The next code point must belong to the set.
    FollowedBy(ClassSet),
}

impl Guard {
    fn allows(self, prev: ClassSet, next: ClassSet) -> bool {
        match self {
            Guard::NotPrecededBy(set) => !prev.intersects(set),
            Guard::NotFollowedBy(set) => !next.intersects(set),
            Guard::PrecededBy(set) => prev.intersects(set),
            Guard::FollowedBy(set) => next.intersects(set),
        }
    }

    fn classes(self) -> ClassSet {
        match self {
            Guard::NotPrecededBy(set)
            | Guard::NotFollowedBy(set)
            | Guard::PrecededBy(set)
            | Guard::FollowedBy(set) => set,
        }
    }
}

/// The position pattern of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Break before any member of the set.
    Before(ClassSet),
    /// Break after any member of the set.
    After(ClassSet),
    /// Break before a maximal run of members (at the run's left edge only).
    BeforeMany(ClassSet),
    /// Break after a maximal run of members (at the run's right edge only).
    AfterMany(ClassSet),
}

impl RuleKind {
    fn classes(self) -> ClassSet {
        match self {
            RuleKind::Before(set)
            | RuleKind::After(set)
            | RuleKind::BeforeMany(set)
            | RuleKind::AfterMany(set) => set,
        }
    }
}

/// One break rule: a position pattern plus its guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakRule {
    kind: RuleKind,
    guards: SmallVec<[Guard; 2]>,
}

impl BreakRule {
    /// Break before members of `classes`.
    #[must_use]
    pub fn before(classes: impl Into<ClassSet>) -> Self {
        Self::new(RuleKind::Before(classes.into()))
    }

    /// Break after members of `classes`.
    #[must_use]
    pub fn after(classes: impl Into<ClassSet>) -> Self {
        Self::new(RuleKind::After(classes.into()))
    }

    /// Break at the left edge of runs of `classes`.
    #[must_use]
    pub fn before_many(classes: impl Into<ClassSet>) -> Self {
        Self::new(RuleKind::BeforeMany(classes.into()))
    }

    /// Break at the right edge of runs of `classes`.
    #[must_use]
    pub fn after_many(classes: impl Into<ClassSet>) -> Self {
        Self::new(RuleKind::AfterMany(classes.into()))
    }

    fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            guards: SmallVec::new(),
        }
    }

    /// Suppress the rule when the previous code point is in `classes`.
    #[must_use]
    pub fn not_preceded_by(mut self, classes: impl Into<ClassSet>) -> Self {
        self.guards.push(Guard::NotPrecededBy(classes.into()));
        self
    }

    /// Suppress the rule when the next code point is in `classes`.
    #[must_use]
    pub fn not_followed_by(mut self, classes: impl Into<ClassSet>) -> Self {
        self.guards.push(Guard::NotFollowedBy(classes.into()));
        self
    }

    /// Require the previous code point to be in `classes`.
    #[must_use]
    pub fn preceded_by(mut self, classes: impl Into<ClassSet>) -> Self {
        self.guards.push(Guard::PrecededBy(classes.into()));
        self
    }

    /// Require the next code point to be in `classes`.
    #[must_use]
    pub fn followed_by(mut self, classes: impl Into<ClassSet>) -> Self {
        self.guards.push(Guard::FollowedBy(classes.into()));
        self
    }

    /// True when the rule fires between code points classified as
    /// `prev` / `next`.
    #[must_use]
    pub fn matches(&self, prev: ClassSet, next: ClassSet) -> bool {
        let positioned = match self.kind {
            RuleKind::Before(set) => next.intersects(set),
            RuleKind::After(set) => prev.intersects(set),
            RuleKind::BeforeMany(set) => next.intersects(set) && !prev.intersects(set),
            RuleKind::AfterMany(set) => prev.intersects(set) && !next.intersects(set),
        };
        positioned && self.guards.iter().all(|g| g.allows(prev, next))
    }
}

/// Why a rule set failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCompileError {
    /// The class table itself is malformed.
    Table(ClassTableError),
    /// A rule's position pattern names no classes.
    EmptyRuleClasses { rule: usize },
    /// A guard on a rule names no classes.
    EmptyGuardClasses { rule: usize },
}

impl std::fmt::Display for RuleCompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table(err) => write!(f, "class table: {err}"),
            Self::EmptyRuleClasses { rule } => {
                write!(f, "rule {rule} matches no character classes")
            }
            Self::EmptyGuardClasses { rule } => {
                write!(f, "rule {rule} has a guard over no character classes")
            }
        }
    }
}

impl std::error::Error for RuleCompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Table(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClassTableError> for RuleCompileError {
    fn from(err: ClassTableError) -> Self {
        Self::Table(err)
    }
}

/// A compiled, immutable disjunction of break rules over a class table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    table: CharClassTable,
    rules: Vec<BreakRule>,
}

impl RuleSet {
    /// Compile class definitions and rules together, validating both.
    pub fn compile(
        defs: &[ClassDef],
        rules: Vec<BreakRule>,
    ) -> Result<Self, RuleCompileError> {
        let table = CharClassTable::compile(defs)?;
        for (index, rule) in rules.iter().enumerate() {
            if rule.kind.classes().is_empty() {
                return Err(RuleCompileError::EmptyRuleClasses { rule: index });
            }
            if rule.guards.iter().any(|g| g.classes().is_empty()) {
                return Err(RuleCompileError::EmptyGuardClasses { rule: index });
            }
        }
        Ok(Self { table, rules })
    }

    /// The full contextual rule set.
    ///
    /// Encodes, in order: breaks around blanks and after hyphens; breaks
    /// around CJK characters except where kinsoku-style context forbids
    /// them (nothing separates an opening bracket from what follows it,
    /// nothing strands a closing mark at a line start); run-edge breaks
    /// around CJK bracket sequences; and a break between closing-then-
    /// opening punctuation pairs like `)(`.
    pub fn advanced() -> Result<Self, RuleCompileError> {
        use ClassId::*;
        Self::compile(
            BUILTIN_CLASSES,
            vec![
                BreakRule::before(Whitespace),
                BreakRule::after(Whitespace | Hyphen),
                BreakRule::before(CjkChar | CjkCurrency)
                    .not_preceded_by(CommonOpening | CjkOpening),
                BreakRule::after(CjkChar).not_followed_by(Hyphen | CommonClosing | CjkClosing),
                BreakRule::before_many(CjkOpening).not_preceded_by(CommonOpening),
                BreakRule::after_many(CjkClosing).not_followed_by(CommonClosing),
                BreakRule::after_many(CommonClosing).followed_by(CommonOpening),
            ],
        )
    }

    /// The guard-free fallback: blanks, hyphens and bare CJK boundaries.
    #[must_use]
    pub fn simplified() -> Self {
        use ClassId::*;
        Self::compile(
            BUILTIN_CLASSES,
            vec![
                BreakRule::before(Whitespace),
                BreakRule::after(Whitespace | Hyphen),
                BreakRule::before(CjkChar),
                BreakRule::after(CjkChar),
            ],
        )
        .expect("builtin class tables are well-formed")
    }

    /// Classify one code point against the set's class table.
    #[must_use]
    pub fn classify(&self, ch: char) -> ClassSet {
        self.table.classify(ch)
    }

    /// True when the position between `prev` and `next` is a break
    /// opportunity under any rule.
    #[must_use]
    pub fn is_break(&self, prev: ClassSet, next: ClassSet) -> bool {
        self.rules.iter().any(|rule| rule.matches(prev, next))
    }
}
