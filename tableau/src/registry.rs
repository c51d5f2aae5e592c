/*!
The atom/variable registry: assigns every propositional atom and every box
in a pair of BoxNNF formulas (Γ and ¬ψ) a dense BDD variable index, in
breadth-first order of first appearance.

Grounded in `relateAtomsAndBDDVars`. The original walks a `deque` seeded
with Γ then ¬ψ, popping from the front, pushing `AND`/`OR` children to the
back, continuing immediately (without counting as a "breadth" step) through
`NOT`, and pushing a box's subformula to the back as a new atomic unit.
Since [crate::formula] already drops `NOT` nodes (see its module docs), the
"continue through NOT" case disappears entirely here: every node the walk
dequeues is either a terminal, a connective, or an atom.
*/

use std::collections::{HashMap, HashSet, VecDeque};

use crate::formula::{Arena, AtomicKey, FormulaId, FormulaOp};

/// A dense BDD variable index. `VarId(0)` is the reserved `existsDia`
/// sentinel (see [Registry::EXISTS_DIA]); every other index names a
/// registered [AtomicKey].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarId(u32);

impl VarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn from_index(i: usize) -> VarId {
        VarId(i as u32)
    }
}

/// The atom/variable registry built from one decision's Γ and ¬ψ.
pub struct Registry {
    /// `keys[0]` is a dummy (the `existsDia` sentinel names no formula);
    /// `keys[i]` for `i >= 1` is the atom/box assigned `VarId(i)`.
    keys: Vec<Option<AtomicKey>>,
    var_of: HashMap<AtomicKey, VarId>,
    /// `children_k[v]`: variables reachable from `v`'s immediate
    /// subformula without crossing a further box.
    children_k: Vec<HashSet<VarId>>,
    /// `children_s4[v]`: as above, but additionally stepping past boxes
    /// reached only through conjunctions.
    children_s4: Vec<HashSet<VarId>>,
}

impl Registry {
    /// The reserved sentinel variable recording "some diamond obligation
    /// exists", wired only in mono-modal K (see
    /// [crate::engine::k]).
    pub const EXISTS_DIA: VarId = VarId(0);

    /// Builds a registry from Γ and ¬ψ, both already in BoxNNF.
    pub fn build(gamma: FormulaId, not_psi: FormulaId, arena: &Arena) -> Registry {
        let mut keys: Vec<Option<AtomicKey>> = vec![None];
        let mut var_of = HashMap::new();
        let mut queue: VecDeque<FormulaId> = VecDeque::new();
        queue.push_back(gamma);
        queue.push_back(not_psi);

        while let Some(id) = queue.pop_front() {
            match arena.get(id) {
                FormulaOp::True | FormulaOp::False => {}
                FormulaOp::And(l, r) | FormulaOp::Or(l, r) => {
                    queue.push_back(l);
                    queue.push_back(r);
                }
                FormulaOp::Atom { key, .. } => {
                    if var_of.contains_key(&key) {
                        continue;
                    }
                    let id = VarId(keys.len() as u32);
                    keys.push(Some(key));
                    var_of.insert(key, id);
                    if let AtomicKey::Modal { body, .. } = key {
                        queue.push_back(body);
                    }
                }
            }
        }

        let num_vars = keys.len();
        let mut registry = Registry {
            keys,
            var_of,
            children_k: vec![HashSet::new(); num_vars],
            children_s4: vec![HashSet::new(); num_vars],
        };
        for i in 1..num_vars {
            let v = VarId(i as u32);
            if let Some(AtomicKey::Modal { body, .. }) = registry.keys[i] {
                let mut k = HashSet::new();
                collect_children(body, arena, &registry.var_of, false, &mut k);
                registry.children_k[i] = k;

                let mut s4 = HashSet::new();
                collect_children(body, arena, &registry.var_of, true, &mut s4);
                registry.children_s4[i] = s4;
            }
        }
        registry
    }

    pub fn num_vars(&self) -> usize {
        self.keys.len()
    }

    /// The variable assigned to `key`, registering it does not assign new
    /// ones: every atom appearing in Γ or ¬ψ is registered by [Self::build].
    pub fn var_of(&self, key: AtomicKey) -> Option<VarId> {
        self.var_of.get(&key).copied()
    }

    pub fn key(&self, v: VarId) -> AtomicKey {
        self.keys[v.index()].expect("VarId(0) (existsDia) has no key")
    }

    pub fn is_modal(&self, v: VarId) -> bool {
        v != Self::EXISTS_DIA && matches!(self.keys[v.index()], Some(AtomicKey::Modal { .. }))
    }

    pub fn children(&self, v: VarId, s4: bool) -> &HashSet<VarId> {
        if s4 {
            &self.children_s4[v.index()]
        } else {
            &self.children_k[v.index()]
        }
    }

    pub fn vars(&self) -> impl Iterator<Item = VarId> + '_ {
        (1..self.keys.len()).map(|i| VarId(i as u32))
    }
}

/// Walks `id` through `AND`/`OR`, collecting the variable of every atom
/// reached. Under `cross_and_boxes`, a box reached while still on a path of
/// only `AND` nodes is additionally descended into (its own children are
/// folded in too); `OR` always ends the "pure conjunction" property for
/// everything beneath it.
fn collect_children(
    id: FormulaId,
    arena: &Arena,
    var_of: &HashMap<AtomicKey, VarId>,
    cross_and_boxes: bool,
    out: &mut HashSet<VarId>,
) {
    match arena.get(id) {
        FormulaOp::True | FormulaOp::False => {}
        FormulaOp::And(l, r) => {
            collect_children(l, arena, var_of, cross_and_boxes, out);
            collect_children(r, arena, var_of, cross_and_boxes, out);
        }
        FormulaOp::Or(l, r) => {
            collect_children(l, arena, var_of, false, out);
            collect_children(r, arena, var_of, false, out);
        }
        FormulaOp::Atom { key, .. } => {
            let v = *var_of
                .get(&key)
                .expect("every atom reachable from a registered formula is itself registered");
            out.insert(v);
            if cross_and_boxes {
                if let AtomicKey::Modal { body, .. } = key {
                    collect_children(body, arena, var_of, true, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RoleInterner;
    use lasso::Rodeo;

    fn build(gamma: &str, psi: &str) -> (Registry, Arena) {
        let mut arena = Arena::new();
        let mut names = Rodeo::new();
        let mut roles = RoleInterner::new();
        let gamma_id =
            crate::parser::parse_line(gamma, &mut arena, &mut names, &mut roles).unwrap();
        let psi_id = crate::parser::parse_line(psi, &mut arena, &mut names, &mut roles).unwrap();
        let not_psi = arena.negate(psi_id);
        let registry = Registry::build(gamma_id, not_psi, &arena);
        (registry, arena)
    }

    #[test]
    fn breadth_first_assigns_gamma_before_psi() {
        let (registry, _arena) = build("a", "b");
        // a comes from Gamma, b from not-psi; Gamma is seeded first.
        assert_eq!(registry.num_vars(), 3); // sentinel + a + b
    }

    #[test]
    fn duplicate_atoms_share_a_variable() {
        let (registry, _arena) = build("p & p", "True");
        // one atom p appears twice but must get only one variable.
        assert_eq!(registry.num_vars(), 2);
    }

    #[test]
    fn box_children_stop_at_nested_box() {
        let (registry, _arena) = build("True", "[r](a & [r]b)");
        let box_var = registry
            .vars()
            .find(|v| registry.is_modal(*v))
            .expect("one box was registered");
        let children = registry.children(box_var, false);
        // `a` and the nested `[r]b` are children; `b` itself is not, under K.
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn s4_children_cross_and_reachable_boxes() {
        let (registry, _arena) = build("True", "[r](a & [r]b)");
        let outer = registry
            .vars()
            .filter(|v| registry.is_modal(*v))
            .min()
            .unwrap();
        let s4_children = registry.children(outer, true);
        // under s4, the walk also steps into the nested box's body, so `b`
        // is reachable too.
        assert!(s4_children.len() >= 2);
    }
}
