//! Contact details shown on the contacts page. Read-only: the admin panel
//! previews them but cannot edit them, so they come from configuration.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactInfo {
    pub address: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: String,
    pub social_media: SocialLinks,
}

impl ContactInfo {
    /// Defaults overridden by any `CONTACT_*` variable that is set.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str, fallback: String| std::env::var(key).unwrap_or(fallback);
        Self {
            address: var("CONTACT_ADDRESS", defaults.address),
            email: var("CONTACT_EMAIL", defaults.email),
            phone: var("CONTACT_PHONE", defaults.phone),
            whatsapp: var("CONTACT_WHATSAPP", defaults.whatsapp),
            social_media: SocialLinks {
                facebook: var("CONTACT_FACEBOOK", defaults.social_media.facebook),
                instagram: var("CONTACT_INSTAGRAM", defaults.social_media.instagram),
                linkedin: var("CONTACT_LINKEDIN", defaults.social_media.linkedin),
            },
        }
    }
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            address: "Luanda, Angola".to_owned(),
            email: "geral@milvendas.com".to_owned(),
            phone: "+244 922 965 959".to_owned(),
            whatsapp: "https://wa.me/244922965959".to_owned(),
            social_media: SocialLinks {
                facebook: "https://facebook.com/milvendas".to_owned(),
                instagram: "https://instagram.com/milvendas".to_owned(),
                linkedin: "https://linkedin.com/company/milvendas".to_owned(),
            },
        }
    }
}
