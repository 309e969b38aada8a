//! Option Enumerations
//!
//! Named indices for the flags of a [`StateControl`](crate::StateControl).
//! Each enumeration labels one tracker: the UI view currently on screen, the
//! display decoration, and the GSM module status.
//!
//! The enumerations carry no behaviour of their own. They implement
//! [`StateIndex`] so a tracker can be sized from them and addressed by them
//! without casting at the call site:
//!
//! ```rust
//! use state_control::{OptionsView, StateControl};
//!
//! let mut view = StateControl::for_options::<OptionsView>();
//! view.set_option(OptionsView::Menu, true, true);
//! assert!(view.is_option(OptionsView::Menu));
//! ```

/// A value that names one flag of a tracker
pub trait StateIndex: Copy {
    /// Number of distinct indices, used to size a tracker
    const COUNT: u8;

    /// Flag index this value maps to, always below `COUNT`
    fn index(self) -> u8;
}

/// Declares a `#[repr(u8)]` option enumeration with its `StateIndex` impl
macro_rules! state_options {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(u8)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every option in index order
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// Maps a flag index back to its option
            pub fn from_index(index: u8) -> Option<Self> {
                Self::ALL.get(usize::from(index)).copied()
            }
        }

        impl StateIndex for $name {
            const COUNT: u8 = $name::ALL.len() as u8;

            fn index(self) -> u8 {
                self as u8
            }
        }
    };
}

state_options! {
    /// Screens and states of the user interface
    pub enum OptionsView {
        /// Main screen
        Main,
        /// Menu screen
        Menu,
        /// Sub-menu 1
        SubMenu1,
        /// Sub-menu 2
        SubMenu2,
        /// Sub-menu 3
        SubMenu3,
        /// Sub-menu 4
        SubMenu4,
        /// Function screen
        Funct,
        /// Invalid option
        InvalidOption,
    }
}

state_options! {
    /// Display decoration options
    pub enum OptionsShow {
        /// Do not show the selection arrow
        NotShowArrow,
        /// Show the selection arrow
        ShowArrow,
        /// Display switched off
        OffDisplay,
    }
}

state_options! {
    /// GSM module states
    pub enum OptionsGsm {
        /// Module is on
        GsmOn,
        /// Incoming call
        IncomingCall,
        /// Call in progress
        CallInProgress,
    }
}
