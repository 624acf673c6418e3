use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 10 caractères — compact, bon contraste.
pub const CHARSET_STANDARD: &str = " .:-=+*#%@";

/// 15 caractères — plus de paliers intermédiaires.
pub const CHARSET_DETAILED: &str = " .,:;i1tfLCG08@";

/// Blocs Unicode — pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Minimal — haut contraste.
pub const CHARSET_MINIMAL: &str = " .:█";

/// Palette "custom" livrée avec l'outil (ponctuation + symboles).
pub const CHARSET_CUSTOM: &str = " .-~:;=!*#$@";

/// Character palette, ordered darkest → lightest before inversion.
///
/// The five named palettes are a closed set. `UserDefined` carries a
/// caller-supplied string; an empty one behaves like `Standard`.
///
/// # Example
/// ```
/// use af_core::charset::Palette;
/// let p: Palette = "blocks".parse().unwrap();
/// assert_eq!(p.chars(), vec![' ', '░', '▒', '▓', '█']);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    /// `" .:-=+*#%@"`
    #[default]
    Standard,
    /// `" .,:;i1tfLCG08@"`
    Detailed,
    /// `" ░▒▓█"`
    Blocks,
    /// `" .:█"`
    Minimal,
    /// `" .-~:;=!*#$@"`
    Custom,
    /// Arbitrary characters supplied by the user.
    UserDefined(String),
}

impl Palette {
    /// Names accepted by [`Palette::from_str`], in display order.
    pub const NAMES: [&'static str; 5] = ["standard", "detailed", "blocks", "minimal", "custom"];

    /// Palette libre fournie par l'utilisateur.
    ///
    /// Control characters are refused: a line break inside the palette would
    /// split a grid row in the text projection.
    ///
    /// # Errors
    /// `CoreError::Config` if `chars` contains a control character.
    ///
    /// # Example
    /// ```
    /// use af_core::charset::Palette;
    /// assert!(Palette::user_defined(" o0").is_ok());
    /// assert!(Palette::user_defined(" o\n0").is_err());
    /// ```
    pub fn user_defined(chars: &str) -> Result<Self, CoreError> {
        if let Some(bad) = chars.chars().find(|c| c.is_control()) {
            return Err(CoreError::Config(format!(
                "caractère de contrôle {bad:?} refusé dans la palette"
            )));
        }
        Ok(Self::UserDefined(chars.to_string()))
    }

    /// Literal character sequence backing this palette.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Standard => CHARSET_STANDARD,
            Self::Detailed => CHARSET_DETAILED,
            Self::Blocks => CHARSET_BLOCKS,
            Self::Minimal => CHARSET_MINIMAL,
            Self::Custom => CHARSET_CUSTOM,
            Self::UserDefined(s) if s.is_empty() => CHARSET_STANDARD,
            Self::UserDefined(s) => s,
        }
    }

    /// Palette entries as Unicode scalars. Never empty.
    ///
    /// # Example
    /// ```
    /// use af_core::charset::Palette;
    /// assert_eq!(Palette::UserDefined(String::new()).chars().len(), 10);
    /// ```
    #[must_use]
    pub fn chars(&self) -> Vec<char> {
        self.as_str().chars().collect()
    }

    /// Short name, `"user"` for caller-supplied palettes.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Detailed => "detailed",
            Self::Blocks => "blocks",
            Self::Minimal => "minimal",
            Self::Custom => "custom",
            Self::UserDefined(_) => "user",
        }
    }
}

impl FromStr for Palette {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "detailed" => Ok(Self::Detailed),
            "blocks" => Ok(Self::Blocks),
            "minimal" => Ok(Self::Minimal),
            "custom" => Ok(Self::Custom),
            other => Err(CoreError::Config(format!(
                "palette inconnue '{other}' (attendu : {})",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
