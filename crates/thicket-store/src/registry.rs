//! The closed registry of node kinds.
//!
//! A registry is a zero-sized marker type listing, in order, every node
//! type a store can hold. It is fixed at compile time and parameterizes
//! [`Store`](crate::Store), so there is no runtime registration step.
//! Define one with [`node_kinds!`](crate::node_kinds).
//!
//! For each kind the registry provides a [`KindDescriptor`]: the element
//! layout the arena allocates with, plus link accessors monomorphized for
//! the concrete type. The store uses those accessors to read and rewrite
//! `child`/`sibling`/`parent` fields without knowing the node type, and
//! uses [`Registry::view`] when a caller wants the value itself.

use std::fmt;

use smallvec::SmallVec;
use thicket_arena::{ArenaError, KindLayout, RawArena};
use thicket_core::{KindId, Links, Node, StoreError};

/// Descriptors of a registry's kinds, in declaration order.
pub type KindList = SmallVec<[KindDescriptor; 8]>;

/// A closed, ordered set of node kinds.
pub trait Registry: Sized + 'static {
    /// Borrowed tagged-union view of a node of any kind in this registry.
    type Ref<'a>: Copy + fmt::Debug;

    /// Descriptors of every kind, indexed by [`KindId`].
    fn kinds() -> KindList;

    /// View the node at `index` in `arena`, whichever kind the arena holds.
    fn view(arena: &RawArena, index: u32) -> Result<Self::Ref<'_>, StoreError>;
}

/// A node type that belongs to registry `R`.
///
/// Implemented by [`node_kinds!`](crate::node_kinds); `KIND` is the type's
/// position in the registry's declaration order.
pub trait Member<R: Registry>: Node {
    /// The kind this type is stored under.
    const KIND: KindId;
}

/// Per-kind metadata resolved once when a store is created.
#[derive(Clone, Copy)]
pub struct KindDescriptor {
    /// Element layout of the kind's arena.
    pub layout: KindLayout,
    read_links: fn(&RawArena, u32) -> Result<Links, ArenaError>,
    write_links: fn(&mut RawArena, u32, Links) -> Result<(), ArenaError>,
}

impl KindDescriptor {
    /// Describe node type `T` under the given kind name.
    pub fn of<T: Node>(name: &'static str) -> Self {
        Self {
            layout: KindLayout::of::<T>(name),
            read_links: read_links::<T>,
            write_links: write_links::<T>,
        }
    }

    /// Declared kind name.
    pub fn name(&self) -> &'static str {
        self.layout.name
    }

    /// Read the link fields of node `index` in `arena`.
    pub fn read_links(&self, arena: &RawArena, index: u32) -> Result<Links, ArenaError> {
        (self.read_links)(arena, index)
    }

    /// Overwrite the link fields of node `index` in `arena`.
    pub fn write_links(
        &self,
        arena: &mut RawArena,
        index: u32,
        links: Links,
    ) -> Result<(), ArenaError> {
        (self.write_links)(arena, index, links)
    }
}

impl fmt::Debug for KindDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindDescriptor")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

fn read_links<T: Node>(arena: &RawArena, index: u32) -> Result<Links, ArenaError> {
    arena.get::<T>(index).map(Node::links)
}

fn write_links<T: Node>(arena: &mut RawArena, index: u32, links: Links) -> Result<(), ArenaError> {
    arena.get_mut::<T>(index).map(|node| node.set_links(links))
}

/// Reject descriptor lists a store cannot be built from.
///
/// The macro-generated registries can only fail the zero-size check (which
/// the arena performs); hand-written [`Registry`] impls get the rest.
pub(crate) fn validate_kinds<R: Registry>(kinds: &[KindDescriptor]) -> Result<(), StoreError> {
    if kinds.is_empty() {
        return Err(StoreError::MalformedKind {
            name: std::any::type_name::<R>(),
            reason: "registry declares no kinds".to_string(),
        });
    }
    if kinds.len() > usize::from(u16::MAX) + 1 {
        return Err(StoreError::MalformedKind {
            name: std::any::type_name::<R>(),
            reason: format!("{} kinds do not fit a 16-bit kind id", kinds.len()),
        });
    }
    for (i, kind) in kinds.iter().enumerate() {
        if let Some(dup) = kinds[i + 1..]
            .iter()
            .find(|other| other.layout.type_id == kind.layout.type_id)
        {
            return Err(StoreError::MalformedKind {
                name: dup.name(),
                reason: format!(
                    "type {} is registered as both '{}' and '{}'",
                    kind.layout.type_name,
                    kind.name(),
                    dup.name()
                ),
            });
        }
    }
    Ok(())
}

/// Declare a registry of node kinds.
///
/// Generates the registry marker type, a borrowed tagged-union view with
/// one variant per kind, and the [`Member`] impls that assign dense
/// [`KindId`]s in declaration order. Every listed type must implement
/// [`Node`] (see [`impl_node!`](crate::impl_node)); a missing impl, or the
/// same type listed twice, is a compile error.
///
/// ```
/// use thicket_store::{impl_node, node_kinds, Address, Member, Store};
///
/// #[derive(Clone, Copy, Debug)]
/// struct Panel {
///     width: u16,
///     child: Option<Address>,
///     sibling: Option<Address>,
///     parent: Option<Address>,
/// }
///
/// #[derive(Clone, Copy, Debug)]
/// struct Glyph {
///     code: char,
///     child: Option<Address>,
///     sibling: Option<Address>,
///     parent: Option<Address>,
/// }
///
/// impl_node!(Panel, Glyph);
///
/// node_kinds! {
///     /// Layout kinds.
///     pub struct Layout;
///     /// Any layout node.
///     pub enum LayoutRef {
///         Panel(Panel),
///         Glyph(Glyph),
///     }
/// }
///
/// assert_eq!(<Glyph as Member<Layout>>::KIND.0, 1);
///
/// let mut store = Store::<Layout>::new(Default::default()).unwrap();
/// let glyph = store
///     .append(Glyph { code: 'x', child: None, sibling: None, parent: None })
///     .unwrap();
/// match store.view(glyph).unwrap() {
///     LayoutRef::Glyph(g) => assert_eq!(g.code, 'x'),
///     LayoutRef::Panel(_) => unreachable!(),
/// }
/// ```
#[macro_export]
macro_rules! node_kinds {
    (
        $(#[$reg_meta:meta])*
        $reg_vis:vis struct $reg:ident;
        $(#[$ref_meta:meta])*
        $ref_vis:vis enum $ref_name:ident {
            $( $(#[$var_meta:meta])* $variant:ident($ty:ty) ),+ $(,)?
        }
    ) => {
        $(#[$reg_meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        $reg_vis struct $reg;

        $(#[$ref_meta])*
        #[derive(Clone, Copy, Debug)]
        $ref_vis enum $ref_name<'a> {
            $( $(#[$var_meta])* $variant(&'a $ty), )+
        }

        const _: () = {
            #[allow(non_camel_case_types)]
            #[repr(u16)]
            enum __thicket_kind_tag {
                $( $variant, )+
            }

            $(
                impl $crate::Member<$reg> for $ty {
                    const KIND: $crate::KindId = $crate::KindId(__thicket_kind_tag::$variant as u16);
                }
            )+

            impl $crate::Registry for $reg {
                type Ref<'a> = $ref_name<'a>;

                fn kinds() -> $crate::KindList {
                    let mut kinds = $crate::KindList::new();
                    $( kinds.push($crate::KindDescriptor::of::<$ty>(stringify!($variant))); )+
                    kinds
                }

                fn view(
                    arena: &$crate::RawArena,
                    index: u32,
                ) -> ::core::result::Result<$ref_name<'_>, $crate::StoreError> {
                    let kind = arena.kind();
                    $(
                        if kind == <$ty as $crate::Member<$reg>>::KIND {
                            return Ok($ref_name::$variant(arena.get::<$ty>(index)?));
                        }
                    )+
                    Err($crate::StoreError::InvalidAddress {
                        raw: $crate::Address::new(kind, index).to_u64(),
                        reason: $crate::AddressFault::UnknownKind {
                            kind_count: [$( stringify!($variant) ),+].len(),
                        },
                    })
                }
            }
        };
    };
}
