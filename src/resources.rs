//! Crisis resource directory.
//!
//! The fixed emergency contacts and online counselling offers surfaced
//! whenever the router takes the crisis path. Entries are data, not
//! behavior — channels decide how to present them.

use serde::{Deserialize, Serialize};

/// A phone contact with an availability window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub description: String,
    pub available: String,
}

impl EmergencyContact {
    /// `tel:` link for the contact, with whitespace stripped from the number.
    pub fn tel_link(&self) -> String {
        let digits: String = self.phone.chars().filter(|c| !c.is_whitespace()).collect();
        format!("tel:{digits}")
    }
}

/// An online counselling offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineResource {
    pub name: String,
    pub url: String,
    pub description: String,
}

/// A resource attached to a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
    pub summary: String,
}

/// The fixed directory presented on the crisis path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisDirectory {
    pub contacts: Vec<EmergencyContact>,
    pub online: Vec<OnlineResource>,
}

impl Default for CrisisDirectory {
    fn default() -> Self {
        Self {
            contacts: vec![
                EmergencyContact {
                    name: "Telefonseelsorge".to_string(),
                    phone: "0800 111 0 111".to_string(),
                    description: "Kostenlos, anonym, rund um die Uhr".to_string(),
                    available: "24/7".to_string(),
                },
                EmergencyContact {
                    name: "Telefonseelsorge".to_string(),
                    phone: "0800 111 0 222".to_string(),
                    description: "Alternative Nummer".to_string(),
                    available: "24/7".to_string(),
                },
                EmergencyContact {
                    name: "Nummer gegen Kummer (Jugendliche)".to_string(),
                    phone: "116 111".to_string(),
                    description: "Speziell für Kinder und Jugendliche".to_string(),
                    available: "Mo-Sa 14-20 Uhr".to_string(),
                },
                EmergencyContact {
                    name: "Notruf".to_string(),
                    phone: "112".to_string(),
                    description: "Bei akuter Lebensgefahr".to_string(),
                    available: "24/7".to_string(),
                },
            ],
            online: vec![
                OnlineResource {
                    name: "Online-Beratung der Telefonseelsorge".to_string(),
                    url: "https://online.telefonseelsorge.de".to_string(),
                    description: "Chat- und E-Mail-Beratung".to_string(),
                },
                OnlineResource {
                    name: "Nummer gegen Kummer Online".to_string(),
                    url: "https://www.nummergegenkummer.de".to_string(),
                    description: "Online-Beratung für Jugendliche".to_string(),
                },
            ],
        }
    }
}

impl CrisisDirectory {
    /// Flatten the directory into message-attachable links.
    pub fn resource_links(&self) -> Vec<ResourceLink> {
        let contacts = self.contacts.iter().map(|c| ResourceLink {
            title: c.name.clone(),
            url: c.tel_link(),
            summary: format!("{} ({})", c.description, c.available),
        });
        let online = self.online.iter().map(|r| ResourceLink {
            title: r.name.clone(),
            url: r.url.clone(),
            summary: r.description.clone(),
        });
        contacts.chain(online).collect()
    }
}
