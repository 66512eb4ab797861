//! Fixed-width bitmask representations of mode sets.
//!
//! [`Mode<T>`](super::types::Mode) models a mode *change* (add/remove a
//! single flag, possibly with an argument) as it appears on the wire.
//! `UserModeSet`/`ChannelModeSet` instead model the *resulting state*: which
//! flags are currently set, packed into a `u32` with one bit per flag. This
//! is the representation a session tracker wants to store and diff, rather
//! than a log of deltas.
//!
//! Only the argumentless subset of mode letters (the ones that make sense as
//! a pure on/off flag) participate in the bitset; list modes (ban, exception)
//! and modes that carry state beyond a single bit (channel key, user limit)
//! are out of scope here and stay in [`Mode<T>`](super::types::Mode) deltas.

use std::fmt;

use super::types::{ChannelMode, UserMode};

macro_rules! bitset {
    ($set:ident, $flag:ty, [$($variant:ident => $bit:expr),+ $(,)?]) => {
        #[doc = concat!("Bitmask of `", stringify!($flag), "` flags.")]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $set(u32);

        impl $set {
            /// The empty set.
            pub const EMPTY: Self = Self(0);

            /// Build a set from a raw bitmask, in case it was stored elsewhere.
            pub const fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            /// The raw bitmask.
            pub const fn bits(&self) -> u32 {
                self.0
            }

            /// Set a flag, returning whether it was already set.
            pub fn insert(&mut self, flag: $flag) -> bool {
                if let Some(bit) = Self::bit_for(flag) {
                    let was_set = self.0 & bit != 0;
                    self.0 |= bit;
                    !was_set
                } else {
                    false
                }
            }

            /// Clear a flag, returning whether it had been set.
            pub fn remove(&mut self, flag: $flag) -> bool {
                if let Some(bit) = Self::bit_for(flag) {
                    let was_set = self.0 & bit != 0;
                    self.0 &= !bit;
                    was_set
                } else {
                    false
                }
            }

            /// Whether a flag is currently set.
            pub fn contains(&self, flag: $flag) -> bool {
                Self::bit_for(flag).map(|bit| self.0 & bit != 0).unwrap_or(false)
            }

            fn bit_for(flag: $flag) -> Option<u32> {
                match flag {
                    $(<$flag>::$variant => Some(1 << $bit),)+
                    _ => None,
                }
            }

            /// Iterate the flags currently set, in canonical bit order.
            pub fn iter(&self) -> impl Iterator<Item = $flag> + '_ {
                const ORDER: &[$flag] = &[$(<$flag>::$variant),+];
                ORDER.iter().copied().filter(move |f| self.contains(*f))
            }
        }

        impl fmt::Display for $set {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for flag in self.iter() {
                    write!(f, "{}", flag)?;
                }
                Ok(())
            }
        }

        impl FromIterator<$flag> for $set {
            fn from_iter<I: IntoIterator<Item = $flag>>(iter: I) -> Self {
                let mut set = Self::EMPTY;
                for flag in iter {
                    set.insert(flag);
                }
                set
            }
        }
    };
}

bitset!(UserModeSet, UserMode, [
    Invisible => 0,
    Wallops => 1,
    Oper => 2,
    LocalOper => 3,
    Registered => 4,
    Away => 5,
    ServerNotice => 6,
    CallerId => 7,
    NoForward => 8,
    RegisteredOnly => 9,
    SecureConn => 10,
    HiddenHost => 11,
    Deaf => 12,
    Helper => 13,
    HideChans => 14,
    WhoisNotify => 15,
    Bot => 16,
]);

bitset!(ChannelModeSet, ChannelMode, [
    Creator => 0,
    Op => 1,
    Voice => 2,
    HalfOp => 3,
    Admin => 4,
    Private => 5,
    Secret => 6,
    InviteOnly => 7,
    TopicProtected => 8,
    NoExternalMessages => 9,
    Moderated => 10,
    Limit => 11,
    Key => 12,
    RegisteredChannel => 13,
    NoColor => 14,
    NoCtcp => 15,
    NoNotice => 16,
]);
