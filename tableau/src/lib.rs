/*!
A hybrid BDD-tableau decision procedure for propositional modal logic.

`tableau` decides satisfiability (and, by duality, validity) of formulas in
the modal logics K (an arbitrary accessibility relation) and S4 (a
reflexive-transitive accessibility relation), optionally multi-modal and
optionally relative to a set of global axioms (a TBox, here called Γ).

# Orientation

A decision is driven by a [context::Context], built once per query from a
[config::Config]. Internally:

- A formula is parsed ([parser]) and rewritten to BoxNNF ([formula::nnf]), in
  which the only modality remaining is `[]` (every `<>phi` becomes `~[]~phi`).
- Every atomic proposition and every boxed subformula is assigned a dense BDD
  variable by the [atom registry](registry), in breadth-first order.
- The formula is translated into a Binary Decision Diagram over these
  variables ([bdd]); this is the *saturation* phase of the tableau, expressed
  as BDD construction rather than explicit branching.
- [engine::k] or [engine::s4] then recursively explores the modal
  obligations implied by a satisfying valuation of that BDD (a *modal jump*),
  backed by several [caches] and a dependency-directed backjumping scheme
  (*refinement* with *responsible variables*).
- [classify] wraps the engine to report unsatisfiable atomic concepts and
  pairwise subsumptions given only Γ.

Everything here is single-threaded and synchronous: a [context::Context] owns
its caches and registry outright, and a fresh instance is required per query
(see [config] for why caches are not reused across top-level queries).

# Logs

As with many BDD/SAT engines, [log] targets are used to narrow output to a
particular part of a decision, e.g. `RUST_LOG=tableau::engine::k=trace`.
*/

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::too_many_arguments)]

pub mod bdd;
pub mod caches;
pub mod classify;
pub mod config;
pub mod context;
pub mod engine;
pub mod formula;
pub mod parser;
pub mod registry;
pub mod reports;
pub mod roles;
pub mod types;
