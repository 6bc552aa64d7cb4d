#![macro_use]
#![allow(unused_macros)]

// Logging shims. With `use-defmt` these forward to defmt, otherwise the
// arguments are only borrowed so that no unused-variable warnings appear.

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "use-defmt")]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(not(feature = "use-defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "use-defmt")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(feature = "use-defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "use-defmt")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(feature = "use-defmt"))]
            let _ = ($( & $x ),*);
        }
    };
}
