/// Set by build.rs from `git describe`, or `GIT_VERSION` in the environment.
pub const GIT_VERSION: &str = env!("GIT_VERSION");
