//! Rule hosts.
//!
//! A rule host is a module whose rules are declared inside one
//! `rule_host!` block. The macro looks at each function's signature: a
//! `(&Release, Option<&Release>)` function becomes a release rule, a
//! `(&Track, Option<&Track>, &Release, Option<&Release>)` function becomes a
//! track rule. Every rule carries a `#[rule(..)]` header naming the constant
//! that holds its metadata:
//!
//! ```ignore
//! rule_host! {
//!     /// Title must be present
//!     #[rule(TITLE_PRESENT, id = "x.title", name = "TitlePresent", level = Error)]
//!     fn title_present(actual: &Release, _reference: Option<&Release>) -> RuleResult {
//!         RuleResult::pass(TITLE_PRESENT)
//!     }
//! }
//! ```
//!
//! The host then exposes `release_rules()` and `track_rules()`, which the
//! registry collects. Adding a rule to a host needs no other edit.

macro_rules! rule_host {
    // Release-scope rule
    (@collect [$($release:tt)*] [$($track:tt)*]
        $(#[doc = $doc:literal])*
        #[rule($meta:ident, id = $id:literal, name = $name:literal, level = $level:ident $(, weight = $weight:literal)?)]
        fn $rule:ident($actual:ident: &Release, $reference:ident: Option<&Release>) -> RuleResult
        $body:block
        $($rest:tt)*
    ) => {
        #[doc = concat!("Metadata of rule ", $id)]
        pub const $meta: $crate::RuleMetadata =
            $crate::RuleMetadata::new($id, $name, $crate::Level::$level)$(.with_weight($weight))?;

        $(#[doc = $doc])*
        pub fn $rule($actual: &$crate::Release, $reference: Option<&$crate::Release>) -> $crate::RuleResult
        $body

        $crate::host::rule_host!(@collect [$($release)* ($rule, $meta)] [$($track)*] $($rest)*);
    };

    // Track-scope rule
    (@collect [$($release:tt)*] [$($track:tt)*]
        $(#[doc = $doc:literal])*
        #[rule($meta:ident, id = $id:literal, name = $name:literal, level = $level:ident $(, weight = $weight:literal)?)]
        fn $rule:ident(
            $actual_track:ident: &Track,
            $reference_track:ident: Option<&Track>,
            $actual:ident: &Release,
            $reference:ident: Option<&Release> $(,)?
        ) -> RuleResult
        $body:block
        $($rest:tt)*
    ) => {
        #[doc = concat!("Metadata of rule ", $id)]
        pub const $meta: $crate::RuleMetadata =
            $crate::RuleMetadata::new($id, $name, $crate::Level::$level)$(.with_weight($weight))?;

        $(#[doc = $doc])*
        pub fn $rule(
            $actual_track: &$crate::Track,
            $reference_track: Option<&$crate::Track>,
            $actual: &$crate::Release,
            $reference: Option<&$crate::Release>,
        ) -> $crate::RuleResult
        $body

        $crate::host::rule_host!(@collect [$($release)*] [$($track)* ($rule, $meta)] $($rest)*);
    };

    // Everything collected
    (@collect [$(($release_rule:ident, $release_meta:ident))*] [$(($track_rule:ident, $track_meta:ident))*]) => {
        /// Release-scope rules declared in this host
        pub(crate) fn release_rules() -> Vec<$crate::registry::ReleaseRule> {
            vec![$($crate::registry::ReleaseRule::new($release_meta, $release_rule)),*]
        }

        /// Track-scope rules declared in this host
        pub(crate) fn track_rules() -> Vec<$crate::registry::TrackRule> {
            vec![$($crate::registry::TrackRule::new($track_meta, $track_rule)),*]
        }
    };

    (@collect [$($release:tt)*] [$($track:tt)*] $($unexpected:tt)+) => {
        compile_error!(
            "rule_host!: expected `#[rule(..)] fn` with a release rule or track rule signature"
        );
    };

    ($($body:tt)*) => {
        $crate::host::rule_host!(@collect [] [] $($body)*);
    };
}

pub(crate) use rule_host;
