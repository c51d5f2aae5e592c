/*!
The formula representation: an arena of structurally-interned nodes in
BoxNNF (Negation Normal Form restricted to the modality `[]`).

Per the design note on replacing raw pointers to formula nodes, formulas are
interned into an arena keyed by structural equality and referred to by index
([FormulaId]) rather than built as a tree of reference-counted nodes. Interning
is what gives two occurrences of the same subformula --- e.g. two mentions of
`[r](a & b)` --- the same id, which is exactly the dedup the atom registry
relies on to assign them a single BDD variable.

`NOT` does not survive as its own node: per the design note on replacing
dynamic dispatch over the formula operator, a BoxNNF leaf is encoded directly
as [FormulaOp::Atom] with a `positive` flag, so "walk across NOT to reach BOX
or AP" collapses to a single match arm. [AtomicKey] is the part of an atom or
box that two occurrences must share to be assigned the same registry
variable; it deliberately ignores polarity, since `p` and `~p` (or `[r]φ` and
`~[r]φ`) are one BDD variable asserted two different ways, not two variables.
*/

pub mod nnf;

use std::collections::HashMap;

use lasso::Spur;

use crate::roles::RoleId;

/// An index into a [Arena]. Canonical: two formulas that are structurally
/// equal after interning share a `FormulaId`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormulaId(u32);

impl FormulaId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The part of an atomic formula (proposition or box) that determines its
/// BDD-variable identity, independent of polarity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum AtomicKey {
    /// A propositional atom, identified by its interned name.
    Prop(Spur),

    /// `[r]φ`, identified by the role (direction included) and the already
    /// BoxNNF-interned `φ`.
    Modal {
        role: RoleId,
        inverse: bool,
        body: FormulaId,
    },
}

/// A node in BoxNNF.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FormulaOp {
    True,
    False,

    /// A leaf: either a proposition or a box, asserted positively or negated.
    Atom { key: AtomicKey, positive: bool },

    And(FormulaId, FormulaId),
    Or(FormulaId, FormulaId),
}

/// An arena of structurally-interned [FormulaOp] nodes.
#[derive(Default)]
pub struct Arena {
    nodes: Vec<FormulaOp>,
    index: HashMap<FormulaOp, FormulaId>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, op: FormulaOp) -> FormulaId {
        if let Some(id) = self.index.get(&op) {
            return *id;
        }
        let id = FormulaId(self.nodes.len() as u32);
        self.nodes.push(op);
        self.index.insert(op, id);
        id
    }

    pub fn mk_true(&mut self) -> FormulaId {
        self.intern(FormulaOp::True)
    }

    pub fn mk_false(&mut self) -> FormulaId {
        self.intern(FormulaOp::False)
    }

    pub fn mk_prop(&mut self, name: Spur, positive: bool) -> FormulaId {
        self.intern(FormulaOp::Atom {
            key: AtomicKey::Prop(name),
            positive,
        })
    }

    pub fn mk_box(
        &mut self,
        role: RoleId,
        inverse: bool,
        body: FormulaId,
        positive: bool,
    ) -> FormulaId {
        self.intern(FormulaOp::Atom {
            key: AtomicKey::Modal {
                role,
                inverse,
                body,
            },
            positive,
        })
    }

    pub fn mk_and(&mut self, l: FormulaId, r: FormulaId) -> FormulaId {
        if l == r {
            return l;
        }
        self.intern(FormulaOp::And(l, r))
    }

    pub fn mk_or(&mut self, l: FormulaId, r: FormulaId) -> FormulaId {
        if l == r {
            return l;
        }
        self.intern(FormulaOp::Or(l, r))
    }

    pub fn get(&self, id: FormulaId) -> FormulaOp {
        self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Negates an already-BoxNNF formula, staying in BoxNNF (the `¬ψ` side
    /// of a decision is always built this way, from the positively-parsed
    /// ψ, rather than re-parsing `~(...)`).
    pub fn negate(&mut self, id: FormulaId) -> FormulaId {
        match self.get(id) {
            FormulaOp::True => self.mk_false(),
            FormulaOp::False => self.mk_true(),
            FormulaOp::Atom { key, positive } => self.intern(FormulaOp::Atom {
                key,
                positive: !positive,
            }),
            FormulaOp::And(l, r) => {
                let l = self.negate(l);
                let r = self.negate(r);
                self.mk_or(l, r)
            }
            FormulaOp::Or(l, r) => {
                let l = self.negate(l);
                let r = self.negate(r);
                self.mk_and(l, r)
            }
        }
    }
}

impl FormulaOp {
    /// True for the leaves (`Atom`); these, and only these, are ever
    /// assigned a BDD variable by the registry.
    pub fn is_atom(self) -> bool {
        matches!(self, FormulaOp::Atom { .. })
    }
}
