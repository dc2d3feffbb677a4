// Display strings for the three supported locales
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Ja,
}

/// Every string the presentation layer can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextKey {
    AppTitle,
    ChooseScene,
    SceneRain,
    SceneForest,
    SceneOcean,
    SceneNight,
    SceneCafe,
    AmbientRain,
    AmbientFire,
    AmbientBirds,
    Playing,
    Paused,
    Buffering,
    Focus,
    Breath,
    BreatheIn,
    BreatheOut,
    GetReady,
    SessionComplete,
}

impl Locale {
    /// Cycles En -> Es -> Ja -> En
    pub fn next(self) -> Self {
        match self {
            Locale::En => Locale::Es,
            Locale::Es => Locale::Ja,
            Locale::Ja => Locale::En,
        }
    }

    pub fn text(self, key: TextKey) -> &'static str {
        match self {
            Locale::En => english(key),
            Locale::Es => spanish(key),
            Locale::Ja => japanese(key),
        }
    }
}

fn english(key: TextKey) -> &'static str {
    match key {
        TextKey::AppTitle => "ZenFlow",
        TextKey::ChooseScene => "Choose your scene",
        TextKey::SceneRain => "Rainy Window",
        TextKey::SceneForest => "Deep Forest",
        TextKey::SceneOcean => "Ocean Drift",
        TextKey::SceneNight => "Midnight City",
        TextKey::SceneCafe => "Corner Cafe",
        TextKey::AmbientRain => "Rain",
        TextKey::AmbientFire => "Fire",
        TextKey::AmbientBirds => "Birds",
        TextKey::Playing => "Playing",
        TextKey::Paused => "Paused",
        TextKey::Buffering => "Buffering...",
        TextKey::Focus => "Focus",
        TextKey::Breath => "Breathe",
        TextKey::BreatheIn => "Breathe in",
        TextKey::BreatheOut => "Breathe out",
        TextKey::GetReady => "Get ready",
        TextKey::SessionComplete => "Session complete",
    }
}

fn spanish(key: TextKey) -> &'static str {
    match key {
        TextKey::AppTitle => "ZenFlow",
        TextKey::ChooseScene => "Elige tu escena",
        TextKey::SceneRain => "Ventana lluviosa",
        TextKey::SceneForest => "Bosque profundo",
        TextKey::SceneOcean => "Deriva oceánica",
        TextKey::SceneNight => "Ciudad de medianoche",
        TextKey::SceneCafe => "Café de la esquina",
        TextKey::AmbientRain => "Lluvia",
        TextKey::AmbientFire => "Fuego",
        TextKey::AmbientBirds => "Pájaros",
        TextKey::Playing => "Reproduciendo",
        TextKey::Paused => "En pausa",
        TextKey::Buffering => "Cargando...",
        TextKey::Focus => "Enfoque",
        TextKey::Breath => "Respirar",
        TextKey::BreatheIn => "Inhala",
        TextKey::BreatheOut => "Exhala",
        TextKey::GetReady => "Prepárate",
        TextKey::SessionComplete => "Sesión completada",
    }
}

fn japanese(key: TextKey) -> &'static str {
    match key {
        TextKey::AppTitle => "ZenFlow",
        TextKey::ChooseScene => "シーンを選択",
        TextKey::SceneRain => "雨の窓辺",
        TextKey::SceneForest => "深い森",
        TextKey::SceneOcean => "海の漂い",
        TextKey::SceneNight => "真夜中の街",
        TextKey::SceneCafe => "街角のカフェ",
        TextKey::AmbientRain => "雨",
        TextKey::AmbientFire => "焚き火",
        TextKey::AmbientBirds => "鳥",
        TextKey::Playing => "再生中",
        TextKey::Paused => "一時停止",
        TextKey::Buffering => "読み込み中...",
        TextKey::Focus => "集中",
        TextKey::Breath => "呼吸",
        TextKey::BreatheIn => "吸って",
        TextKey::BreatheOut => "吐いて",
        TextKey::GetReady => "準備して",
        TextKey::SessionComplete => "セッション完了",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_returns_to_start() {
        let start = Locale::default();
        assert_eq!(start, Locale::En);
        assert_eq!(start.next().next().next(), start);
        assert_eq!(start.next(), Locale::Es);
    }

    #[test]
    fn test_text_lookup() {
        assert_eq!(Locale::En.text(TextKey::BreatheIn), "Breathe in");
        assert_eq!(Locale::Es.text(TextKey::Paused), "En pausa");
        assert_eq!(Locale::Ja.text(TextKey::Focus), "集中");
    }
}
