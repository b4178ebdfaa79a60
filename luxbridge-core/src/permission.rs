//! Permission Gateway
//!
//! ## Overview
//!
//! Host platforms report sensor/camera authorization through their own
//! enums, usually a tri-state ("not asked yet", "allowed", "refused")
//! plus whatever future values an OS update may add. The gateway folds
//! that into a stable two-state-plus-enum result:
//!
//! - "not yet asked" → [`PermissionStatus::Undetermined`]
//! - "explicitly allowed" → [`PermissionStatus::Granted`]
//! - "explicitly refused" or "restricted by policy" →
//!   [`PermissionStatus::Denied`]
//! - anything unrecognized → [`PermissionStatus::Undetermined`] — the
//!   safe default; unknown must never read as granted.
//!
//! ## Freshness
//!
//! Status is never cached by the bridge: every query goes to the platform,
//! because authorization can change while the app is backgrounded.
//! Implementations of [`PermissionGateway`] must do the same.

/// Stable authorization status exposed by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PermissionStatus {
    /// The user has not decided yet (or the platform reported something
    /// this crate does not recognize)
    Undetermined = 0,
    /// The user explicitly allowed access
    Granted = 1,
    /// The user refused, or policy restricts access
    Denied = 2,
}

impl PermissionStatus {
    /// Fold a platform authorization value into the stable status
    pub const fn from_platform(platform: PlatformAuthorization) -> Self {
        match platform {
            PlatformAuthorization::NotDetermined => PermissionStatus::Undetermined,
            PlatformAuthorization::Authorized => PermissionStatus::Granted,
            PlatformAuthorization::DeniedByUser | PlatformAuthorization::Restricted => {
                PermissionStatus::Denied
            }
            // Future platform values: never assume granted
            PlatformAuthorization::Unknown(_) => PermissionStatus::Undetermined,
        }
    }

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            PermissionStatus::Undetermined => "undetermined",
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
        }
    }
}

/// Authorization status as reported by the host platform
///
/// `Unknown` carries the raw platform discriminant so diagnostics can log
/// what the OS actually said.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformAuthorization {
    /// The user was never prompted
    NotDetermined,
    /// Access explicitly allowed
    Authorized,
    /// Access explicitly refused by the user
    DeniedByUser,
    /// Access restricted by device policy (parental controls, MDM)
    Restricted,
    /// A value this crate does not recognize
    Unknown(u8),
}

/// Authorization query result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermissionResponse {
    /// True iff `status == Granted`
    pub granted: bool,
    /// The folded status
    pub status: PermissionStatus,
}

impl PermissionResponse {
    /// Build a response from a folded status
    pub const fn from_status(status: PermissionStatus) -> Self {
        Self {
            granted: matches!(status, PermissionStatus::Granted),
            status,
        }
    }
}

/// Host capability answering authorization queries
///
/// `status` must query the platform fresh on every call and never prompt.
/// `request` prompts only when the current status is undetermined; once
/// the user has decided, platforms refuse to re-prompt and so does this
/// trait — the current response is returned unchanged. A real `request`
/// may suspend indefinitely pending user interaction; no timeout is
/// imposed here.
pub trait PermissionGateway {
    /// Read-only query of the current authorization status
    fn status(&self) -> PermissionResponse;

    /// Request authorization, prompting the user if undetermined
    fn request(&self) -> PermissionResponse;
}

/// In-memory gateway with a scripted decision
///
/// Stands in for the platform permission capability in tests and
/// examples: starts from any status, resolves prompts to a preconfigured
/// decision, and counts how often the user would have been prompted.
pub struct StaticGateway {
    status: core::sync::atomic::AtomicU8,
    decision: PermissionStatus,
    prompts: core::sync::atomic::AtomicUsize,
}

impl StaticGateway {
    /// Gateway fixed at `Granted`
    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted, PermissionStatus::Granted)
    }

    /// Gateway fixed at `Denied`
    pub fn denied() -> Self {
        Self::new(PermissionStatus::Denied, PermissionStatus::Denied)
    }

    /// Gateway starting undetermined, resolving prompts to `decision`
    pub fn undetermined(decision: PermissionStatus) -> Self {
        Self::new(PermissionStatus::Undetermined, decision)
    }

    fn new(initial: PermissionStatus, decision: PermissionStatus) -> Self {
        Self {
            status: core::sync::atomic::AtomicU8::new(initial as u8),
            decision,
            prompts: core::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// How many times a prompt was shown
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(core::sync::atomic::Ordering::Acquire)
    }

    /// Simulate the user revoking or changing authorization from outside
    pub fn set_status(&self, status: PermissionStatus) {
        self.status
            .store(status as u8, core::sync::atomic::Ordering::Release);
    }

    fn current(&self) -> PermissionStatus {
        match self.status.load(core::sync::atomic::Ordering::Acquire) {
            1 => PermissionStatus::Granted,
            2 => PermissionStatus::Denied,
            _ => PermissionStatus::Undetermined,
        }
    }
}

impl PermissionGateway for StaticGateway {
    fn status(&self) -> PermissionResponse {
        PermissionResponse::from_status(self.current())
    }

    fn request(&self) -> PermissionResponse {
        if self.current() == PermissionStatus::Undetermined {
            self.prompts
                .fetch_add(1, core::sync::atomic::Ordering::AcqRel);
            self.set_status(self.decision);
        }
        PermissionResponse::from_status(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_mapping() {
        use PlatformAuthorization as P;

        assert_eq!(
            PermissionStatus::from_platform(P::NotDetermined),
            PermissionStatus::Undetermined
        );
        assert_eq!(
            PermissionStatus::from_platform(P::Authorized),
            PermissionStatus::Granted
        );
        assert_eq!(
            PermissionStatus::from_platform(P::DeniedByUser),
            PermissionStatus::Denied
        );
        assert_eq!(
            PermissionStatus::from_platform(P::Restricted),
            PermissionStatus::Denied
        );
    }

    #[test]
    fn unknown_platform_values_never_grant() {
        for raw in 0..=u8::MAX {
            let folded = PermissionStatus::from_platform(PlatformAuthorization::Unknown(raw));
            assert_eq!(folded, PermissionStatus::Undetermined);
        }
    }

    #[test]
    fn response_flag_matches_status() {
        assert!(PermissionResponse::from_status(PermissionStatus::Granted).granted);
        assert!(!PermissionResponse::from_status(PermissionStatus::Denied).granted);
        assert!(!PermissionResponse::from_status(PermissionStatus::Undetermined).granted);
    }

    #[test]
    fn request_prompts_only_when_undetermined() {
        let gateway = StaticGateway::undetermined(PermissionStatus::Granted);

        let response = gateway.request();
        assert!(response.granted);
        assert_eq!(gateway.prompt_count(), 1);

        // Decided: further requests return immediately without prompting
        let response = gateway.request();
        assert!(response.granted);
        assert_eq!(gateway.prompt_count(), 1);
    }

    #[test]
    fn request_when_denied_returns_immediately() {
        let gateway = StaticGateway::denied();

        let response = gateway.request();
        assert!(!response.granted);
        assert_eq!(response.status, PermissionStatus::Denied);
        assert_eq!(gateway.prompt_count(), 0);
    }

    #[test]
    fn status_never_prompts() {
        let gateway = StaticGateway::undetermined(PermissionStatus::Granted);

        let response = gateway.status();
        assert_eq!(response.status, PermissionStatus::Undetermined);
        assert_eq!(gateway.prompt_count(), 0);
    }
}
