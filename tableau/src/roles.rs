/*!
Role interning.

Accessibility-relation names (`r` in `[r]φ`/`⟨r⟩φ`) are interned to dense
integer ids via [lasso], the same string-interning crate used elsewhere in
the retrieval pack for this kind of small, append-only symbol table.

Inverse roles (surface syntax `<-r>`, `[-r]`) intern to the *same* [RoleId]
as their base role; the direction is tracked separately as a `bool` on each
occurrence, rather than folded into the id as the original C++ source did
with negative integers. See [crate::formula] for where that flag is carried.
*/

use lasso::{Rodeo, Spur};

/// A dense identifier for an accessibility-relation name, irrespective of
/// direction (`r` and `-r` share an id).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RoleId(u32);

impl RoleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn from_index(i: usize) -> RoleId {
        RoleId(i as u32)
    }
}

/// Interns role names and assigns them a dense `RoleId` in first-appearance
/// order, for iteration "role r = 1..numRoles" in ascending order as
/// required of modal-jump ordering.
#[derive(Default)]
pub struct RoleInterner {
    names: Rodeo,
    ids: Vec<Spur>,
}

impl RoleInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name`, returning its `RoleId`. Repeated calls with the same
    /// name return the same id.
    pub fn intern(&mut self, name: &str) -> RoleId {
        let spur = self.names.get_or_intern(name);
        match self.ids.iter().position(|s| *s == spur) {
            Some(index) => RoleId(index as u32),
            None => {
                self.ids.push(spur);
                RoleId((self.ids.len() - 1) as u32)
            }
        }
    }

    pub fn num_roles(&self) -> usize {
        self.ids.len()
    }

    pub fn name(&self, id: RoleId) -> &str {
        self.names.resolve(&self.ids[id.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_share_an_id() {
        let mut roles = RoleInterner::new();
        let a = roles.intern("knows");
        let b = roles.intern("likes");
        let a_again = roles.intern("knows");
        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_eq!(roles.num_roles(), 2);
        assert_eq!(roles.name(a), "knows");
        assert_eq!(roles.name(b), "likes");
    }
}
