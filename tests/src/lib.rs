//! End-to-end checks of the discovery engine against scripted name services.

#[cfg(test)]
mod profiling;
#[cfg(test)]
mod snapshot;
#[cfg(test)]
mod util;
