/// Voice used when a requested name is not in the catalogue.
pub const DEFAULT_VOICE_ID: &str = "en-US-GuyNeural";

/// Voice preselected for new requests.
pub const DEFAULT_VOICE_NAME: &str = "Andrew (Neural) - US Male";

/// A narration voice: the name users pick and the id the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub name: &'static str,
    pub id: &'static str,
}

impl Voice {
    const fn new(name: &'static str, id: &'static str) -> Self {
        Self { name, id }
    }
}

const VOICES: [Voice; 15] = [
    Voice::new("Guy (Neural) - US Male", "en-US-GuyNeural"),
    Voice::new("Christopher (Neural) - US Male", "en-US-ChristopherNeural"),
    Voice::new("Andrew (Neural) - US Male", "en-US-AndrewNeural"),
    Voice::new("Eric (Neural) - US Male", "en-US-EricNeural"),
    Voice::new("Brian (Neural) - US Male", "en-US-BrianNeural"),
    Voice::new("Steffan (Neural) - US Male", "en-US-SteffanNeural"),
    Voice::new("Jenny (Neural) - US Female", "en-US-JennyNeural"),
    Voice::new("Aria (Neural) - US Female", "en-US-AriaNeural"),
    Voice::new("Ava (Neural) - US Female", "en-US-AvaNeural"),
    Voice::new("Ana (Neural) - US Child/Female", "en-US-AnaNeural"),
    Voice::new("Michelle (Neural) - US Female", "en-US-MichelleNeural"),
    Voice::new("Ryan (Neural) - UK Male", "en-GB-RyanNeural"),
    Voice::new("Sonia (Neural) - UK Female", "en-GB-SoniaNeural"),
    Voice::new("Prabhat (Neural) - IN Male", "en-IN-PrabhatNeural"),
    Voice::new("Neerja (Neural) - IN Female", "en-IN-NeerjaNeural"),
];

/// The voices offered to users.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceCatalog;

impl VoiceCatalog {
    pub fn all(&self) -> &'static [Voice] {
        &VOICES
    }

    pub fn find(&self, name: &str) -> Option<&'static Voice> {
        VOICES.iter().find(|v| v.name == name)
    }

    /// Backend id for `key`.
    ///
    /// Catalogue names map to their id. A key that looks like a backend id
    /// (`en-US-GuyNeural`) is passed through untouched. Anything else gets the
    /// default voice.
    pub fn resolve<'k>(&self, key: &'k str) -> &'k str {
        if let Some(voice) = self.find(key) {
            return voice.id;
        }
        if looks_like_backend_id(key) {
            return key;
        }
        tracing::warn!(voice = key, fallback = DEFAULT_VOICE_ID, "unknown voice, using default");
        DEFAULT_VOICE_ID
    }
}

fn looks_like_backend_id(key: &str) -> bool {
    key.contains('-') && !key.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_names_resolve() {
        let catalog = VoiceCatalog;
        assert_eq!(catalog.resolve("Andrew (Neural) - US Male"), "en-US-AndrewNeural");
        assert_eq!(catalog.resolve("Sonia (Neural) - UK Female"), "en-GB-SoniaNeural");
        assert_eq!(catalog.all().len(), 15);
    }

    #[test]
    fn test_backend_id_passes_through() {
        assert_eq!(VoiceCatalog.resolve("en-AU-NatashaNeural"), "en-AU-NatashaNeural");
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(VoiceCatalog.resolve("Robot Voice"), DEFAULT_VOICE_ID);
        assert_eq!(VoiceCatalog.resolve("Zed (Neural) - US Male"), DEFAULT_VOICE_ID);
        assert_eq!(VoiceCatalog.resolve(""), DEFAULT_VOICE_ID);
    }

    #[test]
    fn test_default_name_is_in_catalogue() {
        assert!(VoiceCatalog.find(DEFAULT_VOICE_NAME).is_some());
    }
}
