//! Desktop colour-scheme detection for the `system` theme.
//!
//! On Linux the XDG desktop portal is asked for
//! `org.freedesktop.appearance color-scheme`. When the portal has no
//! preference or is unreachable, `GTK_THEME` is checked for a dark variant.
//! Other platforms resolve to dark.

#![cfg_attr(not(target_os = "linux"), allow(dead_code))]

use margin_core::Appearance;
use margin_core::prefs::SystemAppearance;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopAppearance;

impl SystemAppearance for DesktopAppearance {
    fn detect(&self) -> Appearance {
        let appearance = detect_platform_appearance();
        debug!(%appearance, "desktop appearance detected");
        appearance
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColorScheme {
    NoPreference,
    PreferDark,
    PreferLight,
}

impl ColorScheme {
    fn from_portal_value(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::NoPreference),
            1 => Some(Self::PreferDark),
            2 => Some(Self::PreferLight),
            _ => None,
        }
    }
}

fn gtk_theme_is_dark(gtk_theme: Option<&str>) -> bool {
    gtk_theme.is_some_and(|theme| theme.to_ascii_lowercase().contains("dark"))
}

fn resolve(
    scheme: Option<ColorScheme>,
    gtk_theme: Option<&str>,
) -> Appearance {
    let dark = match scheme {
        Some(ColorScheme::PreferDark) => true,
        Some(ColorScheme::PreferLight) => false,
        Some(ColorScheme::NoPreference) | None => gtk_theme_is_dark(gtk_theme),
    };
    if dark { Appearance::Dark } else { Appearance::Light }
}

#[cfg(target_os = "linux")]
mod portal {
    use zbus::{
        blocking::{Connection, Proxy},
        zvariant::OwnedValue,
    };

    use super::ColorScheme;

    const PORTAL_SERVICE: &str = "org.freedesktop.portal.Desktop";
    const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
    const PORTAL_INTERFACE: &str = "org.freedesktop.portal.Settings";

    fn read_portal_setting(
        namespace: &str,
        key: &str,
    ) -> Option<OwnedValue> {
        let connection = Connection::session().ok()?;
        let proxy = Proxy::new(&connection, PORTAL_SERVICE, PORTAL_PATH, PORTAL_INTERFACE).ok()?;

        proxy.call("ReadOne", &(namespace, key)).ok()
    }

    fn parse_color_scheme(value: OwnedValue) -> Option<ColorScheme> {
        let raw = value
            .try_clone()
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .or_else(|| {
                value
                    .try_clone()
                    .ok()
                    .and_then(|v| i32::try_from(v).ok())
                    .and_then(|v| u32::try_from(v).ok())
            })?;

        ColorScheme::from_portal_value(raw)
    }

    pub(super) fn color_scheme() -> Option<ColorScheme> {
        read_portal_setting("org.freedesktop.appearance", "color-scheme")
            .and_then(parse_color_scheme)
    }
}

#[cfg(target_os = "linux")]
fn detect_platform_appearance() -> Appearance {
    let gtk_theme = std::env::var("GTK_THEME").ok();
    resolve(portal::color_scheme(), gtk_theme.as_deref())
}

#[cfg(not(target_os = "linux"))]
fn detect_platform_appearance() -> Appearance {
    Appearance::Dark
}
