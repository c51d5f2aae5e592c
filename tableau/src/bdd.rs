/*!
A thin layer over [biodivine_lib_bdd], the concrete ROBDD library satisfying
the black-box contract this crate is built against: canonical node
identity, `ithvar`/`nithvar` literal constructors, Boolean connectives, and
extraction of one satisfying assignment together with its support.

[Manager] owns the fixed variable order --- the one the [crate::registry]
computed by its breadth-first walk --- and is the only thing that knows how
a [crate::registry::VarId] maps to a `biodivine_lib_bdd::BddVariable`. Once
built, a decision never adds variables, matching `-reorder`/`-onlygamma`
being accepted but documented no-ops (see `SPEC_FULL.md`): this library has
no dynamic reordering, so the registry's order is final.
*/

use std::collections::{HashMap, HashSet};

use biodivine_lib_bdd::{Bdd, BddVariable, BddVariableSetBuilder};

use crate::formula::{Arena, AtomicKey, FormulaOp};
use crate::registry::{Registry, VarId};

/// Owns the BDD variable set and the `VarId <-> BddVariable` mapping.
pub struct Manager {
    vars: Vec<BddVariable>,
    index_of: HashMap<BddVariable, usize>,
    universe: biodivine_lib_bdd::BddVariableSet,
}

impl Manager {
    /// Allocates one `BddVariable` per registered variable, in registry
    /// order (index 0, the `existsDia` sentinel, included so `VarId.index()`
    /// can be used directly).
    pub fn new(registry: &Registry) -> Manager {
        let mut builder = BddVariableSetBuilder::new();
        let vars: Vec<BddVariable> = (0..registry.num_vars())
            .map(|i| builder.make_variable(&format!("v{i}")))
            .collect();
        let index_of = vars.iter().enumerate().map(|(i, bv)| (*bv, i)).collect();
        Manager {
            vars,
            index_of,
            universe: builder.build(),
        }
    }

    fn var(&self, v: VarId) -> BddVariable {
        self.vars[v.index()]
    }

    fn var_id(&self, bv: BddVariable) -> VarId {
        VarId::from_index(self.index_of[&bv])
    }

    pub fn bdd_true(&self) -> Bdd {
        self.universe.mk_true()
    }

    pub fn bdd_false(&self) -> Bdd {
        self.universe.mk_false()
    }

    pub fn ithvar(&self, v: VarId) -> Bdd {
        self.universe.mk_literal(self.var(v), true)
    }

    pub fn nithvar(&self, v: VarId) -> Bdd {
        self.universe.mk_literal(self.var(v), false)
    }

    /// The Rust-native stand-in for `bdd_satone(B)`/`rightValuation(B)`: the
    /// lexicographically first (left-to-right) or last (`rtol`, `-rtol`)
    /// *path* through `b`, i.e. a conjunctive clause over exactly the
    /// variables forced along the chosen branch --- not a dense valuation
    /// over every registered variable. This is what `extractSatisfyingModalVars`
    /// walks in the source: a variable absent from the path is a genuine
    /// don't-care, not an assignment of `false`.
    pub fn satone(&self, b: &Bdd, rtol: bool) -> Option<Vec<(VarId, bool)>> {
        let path = if rtol { b.last_path()? } else { b.first_path()? };
        Some(
            path.to_values()
                .into_iter()
                .map(|(bv, val)| (self.var_id(bv), val))
                .collect(),
        )
    }

    pub fn support(&self, b: &Bdd) -> HashSet<VarId> {
        let support_vars = b.support_set();
        support_vars.into_iter().map(|bv| self.var_id(bv)).collect()
    }
}

/// `to_bdd(f)`: the saturation translation of a BoxNNF formula into a BDD
/// over registered variables.
///
/// `mono_modal_exists_dia` is `true` exactly when `existsDia` is wired
/// (`!s4 && num_roles <= 1 && !inverse_roles`, see `SPEC_FULL.md`); when
/// true, every positive modal leaf is conjoined with `ithvar(existsDia)`
/// and every negative modal leaf with `nithvar(existsDia)`.
pub fn to_bdd(
    f: crate::formula::FormulaId,
    arena: &Arena,
    registry: &Registry,
    manager: &Manager,
    mono_modal_exists_dia: bool,
) -> Bdd {
    match arena.get(f) {
        FormulaOp::True => manager.bdd_true(),
        FormulaOp::False => manager.bdd_false(),
        FormulaOp::Atom { key, positive } => {
            let v = registry
                .var_of(key)
                .expect("every formula fed to to_bdd was registered");
            let literal = if positive {
                manager.ithvar(v)
            } else {
                manager.nithvar(v)
            };
            if mono_modal_exists_dia && registry.is_modal(v) {
                literal.and(&manager.ithvar(Registry::EXISTS_DIA))
            } else {
                literal
            }
        }
        FormulaOp::And(l, r) => {
            let l = to_bdd(l, arena, registry, manager, mono_modal_exists_dia);
            let r = to_bdd(r, arena, registry, manager, mono_modal_exists_dia);
            l.and(&r)
        }
        FormulaOp::Or(l, r) => {
            let l = to_bdd(l, arena, registry, manager, mono_modal_exists_dia);
            let r = to_bdd(r, arena, registry, manager, mono_modal_exists_dia);
            l.or(&r)
        }
    }
}

/// `to_not_bdd(f)`: the BDD of `¬f`, computed by De Morgan at the tree
/// level rather than by negating the result of [to_bdd]. `existsDia` is only
/// ever added on the direct positive-box side; undoing a double negation
/// (the `positive == false` arm below, `f`'s own atom already asserted
/// negatively) never adds it, matching the source's asymmetry between its
/// `BOX` and `NOT` cases.
pub fn to_not_bdd(
    f: crate::formula::FormulaId,
    arena: &Arena,
    registry: &Registry,
    manager: &Manager,
    mono_modal_exists_dia: bool,
) -> Bdd {
    match arena.get(f) {
        FormulaOp::True => manager.bdd_false(),
        FormulaOp::False => manager.bdd_true(),
        FormulaOp::Atom { key, positive } => {
            let v = registry
                .var_of(key)
                .expect("every formula fed to to_not_bdd was registered");
            if positive {
                let literal = manager.nithvar(v);
                if mono_modal_exists_dia && registry.is_modal(v) {
                    literal.and(&manager.ithvar(Registry::EXISTS_DIA))
                } else {
                    literal
                }
            } else {
                manager.ithvar(v)
            }
        }
        FormulaOp::And(l, r) => {
            let l = to_not_bdd(l, arena, registry, manager, mono_modal_exists_dia);
            let r = to_not_bdd(r, arena, registry, manager, mono_modal_exists_dia);
            l.or(&r)
        }
        FormulaOp::Or(l, r) => {
            let l = to_not_bdd(l, arena, registry, manager, mono_modal_exists_dia);
            let r = to_not_bdd(r, arena, registry, manager, mono_modal_exists_dia);
            l.and(&r)
        }
    }
}

/// `to_bdd_s4_unbox(f)`: S4's eager stripping of surface boxes reachable
/// through only conjunctions. A box met while still on a pure-`AND` path
/// from the root is unboxed (its own body is descended into, without ever
/// emitting a literal for the box itself); an `OR` boundary, like `to_bdd`,
/// falls back to emitting ordinary literals from that point down.
pub fn to_bdd_s4_unbox(
    f: crate::formula::FormulaId,
    arena: &Arena,
    registry: &Registry,
    manager: &Manager,
) -> Bdd {
    match arena.get(f) {
        FormulaOp::And(l, r) => {
            let l = to_bdd_s4_unbox(l, arena, registry, manager);
            let r = to_bdd_s4_unbox(r, arena, registry, manager);
            l.and(&r)
        }
        FormulaOp::Atom {
            key: AtomicKeyBox @ crate::formula::AtomicKey::Modal { body, .. },
            positive: true,
        } => {
            let _ = AtomicKeyBox;
            to_bdd_s4_unbox(body, arena, registry, manager)
        }
        // A negative box (`~[r]phi`, i.e. an asserted diamond) is not a
        // surface box to strip; S4 mode never uses mono-modal existsDia.
        _ => to_bdd(f, arena, registry, manager, false),
    }
}
