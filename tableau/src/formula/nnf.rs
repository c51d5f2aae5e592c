/*!
The BoxNNF rewrite, i.e. `toBoxNNF` from the original source, restructured
as the standard "push negation down, track polarity" NNF translation rather
than a large switch over `NOT`-of-every-operator. The two are semantically
identical; the polarity-passing form just means there is one match arm per
surface operator instead of two (one direct, one under a `NOT`).

Surface syntax (produced by [crate::parser]) still has `NOT`, `IMP`, `EQU`
and `DIA`; this module eliminates all four, leaving only the forms in
[crate::formula::FormulaOp].
*/

use lasso::Rodeo;

use crate::formula::{Arena, FormulaId};
use crate::roles::RoleId;

/// The raw surface syntax, prior to BoxNNF.
#[derive(Clone, Debug)]
pub enum Expr {
    True,
    False,
    Ap(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Imp(Box<Expr>, Box<Expr>),
    Equ(Box<Expr>, Box<Expr>),
    Box_ {
        role: RoleId,
        inverse: bool,
        body: Box<Expr>,
    },
    Dia {
        role: RoleId,
        inverse: bool,
        body: Box<Expr>,
    },
}

/// Rewrites `expr` to BoxNNF, interning every node into `arena` and every
/// propositional atom name into `names`.
///
/// `positive` is the polarity under which `expr` is asserted: `to_box_nnf(e,
/// false, ..)` is the BoxNNF of `~e`, computed without ever materializing a
/// `Not` node.
pub fn to_box_nnf(expr: &Expr, positive: bool, arena: &mut Arena, names: &mut Rodeo) -> FormulaId {
    match expr {
        Expr::True => {
            if positive {
                arena.mk_true()
            } else {
                arena.mk_false()
            }
        }
        Expr::False => {
            if positive {
                arena.mk_false()
            } else {
                arena.mk_true()
            }
        }
        Expr::Ap(name) => {
            let spur = names.get_or_intern(name);
            arena.mk_prop(spur, positive)
        }
        Expr::Not(inner) => to_box_nnf(inner, !positive, arena, names),
        Expr::And(l, r) => {
            let lhs = to_box_nnf(l, positive, arena, names);
            let rhs = to_box_nnf(r, positive, arena, names);
            if positive {
                arena.mk_and(lhs, rhs)
            } else {
                arena.mk_or(lhs, rhs)
            }
        }
        Expr::Or(l, r) => {
            let lhs = to_box_nnf(l, positive, arena, names);
            let rhs = to_box_nnf(r, positive, arena, names);
            if positive {
                arena.mk_or(lhs, rhs)
            } else {
                arena.mk_and(lhs, rhs)
            }
        }
        // l => r  ==  ~l | r
        Expr::Imp(l, r) => {
            let lhs = to_box_nnf(l, !positive, arena, names);
            let rhs = to_box_nnf(r, positive, arena, names);
            if positive {
                arena.mk_or(lhs, rhs)
            } else {
                arena.mk_and(lhs, rhs)
            }
        }
        // l <=> r  ==  (l & r) | (~l & ~r)
        // ~(l <=> r) == (l & ~r) | (~l & r)
        Expr::Equ(l, r) => {
            let l_pos = to_box_nnf(l, true, arena, names);
            let l_neg = to_box_nnf(l, false, arena, names);
            let r_pos = to_box_nnf(r, true, arena, names);
            let r_neg = to_box_nnf(r, false, arena, names);
            if positive {
                let both_pos = arena.mk_and(l_pos, r_pos);
                let both_neg = arena.mk_and(l_neg, r_neg);
                arena.mk_or(both_pos, both_neg)
            } else {
                let pos_neg = arena.mk_and(l_pos, r_neg);
                let neg_pos = arena.mk_and(l_neg, r_pos);
                arena.mk_or(pos_neg, neg_pos)
            }
        }
        // BoxNNF([r]phi) = [r]BoxNNF(phi); BoxNNF(~[r]phi) = ~[r]BoxNNF(phi)
        Expr::Box_ {
            role,
            inverse,
            body,
        } => {
            let child = to_box_nnf(body, true, arena, names);
            arena.mk_box(*role, *inverse, child, positive)
        }
        // BoxNNF(<r>phi) = ~[r]BoxNNF(~phi); BoxNNF(~<r>phi) = [r]BoxNNF(~phi)
        //
        // This normalizes modalities so `<r>phi` and `~[r]~phi` share a BDD
        // variable, since they are the same proposition.
        Expr::Dia {
            role,
            inverse,
            body,
        } => {
            let child = to_box_nnf(body, false, arena, names);
            arena.mk_box(*role, *inverse, child, !positive)
        }
    }
}
