//! Placeholder features for products the backend sends without any.
//!
//! The table is scanned top to bottom and the first entry whose patterns all
//! occur in the lower-cased product name wins. More specific entries must
//! stay above the general ones they overlap with (the Stratocaster entry
//! above plain "guitarra eléctrica").

/// One row of the fallback table.
struct FallbackEntry {
    /// Every pattern must be contained in the lower-cased name.
    patterns: &'static [&'static str],
    /// Brand, type, size, material, mechanism, product label.
    features: [&'static str; 6],
}

const FALLBACK_TABLE: &[FallbackEntry] = &[
    FallbackEntry {
        patterns: &["timbal", "cencerro"],
        features: [
            "Marca: LP Aspire",
            "Tipo: timbal",
            "Tamaño: estándar",
            "Material: Aluminio y parches PET",
            "Mecanismo: percusión",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["platillos"],
        features: [
            "Marca: Sabian",
            "Tipo: platillos",
            "Tamaño: estándar",
            "Material: cobre",
            "Mecanismo: percusión",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["batería eléctrica"],
        features: [
            "Marca: Mapex",
            "Tipo: Batería",
            "Tamaño: Grande",
            "Material: Aluminio y parches PET",
            "Mecanismo: percusión",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["sintetizador"],
        features: [
            "Marca: Kross",
            "Tipo: Sintetizador",
            "Tamaño: compacto",
            "Material: Vinilo, ABS y aluminio",
            "Mecanismo: Digital",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["teclado"],
        features: [
            "Marca: Yamaha",
            "Tipo: teclado",
            "Tamaño: estándar",
            "Material: aluminio",
            "Mecanismo: cuerda",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["marimba"],
        features: [
            "Marca: Tonson",
            "Tipo: diatónica",
            "Tamaño: compacto",
            "Material: pino",
            "Mecanismo: percusión",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["maracas"],
        features: [
            "Marca: Yamaha",
            "Tipo: sonajeros",
            "Tamaño: pequeño",
            "Material: plástico ABS y madera",
            "Mecanismo: percusión",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["guitarra eléctrica stratocaster"],
        features: [
            "Marca: Stratocaster",
            "Tipo: eléctrica",
            "Tamaño: estándar",
            "Material: fibra de carbono y madera",
            "Mecanismo: cuerda",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["guitarra eléctrica"],
        features: [
            "Marca: Gibson",
            "Tipo: eléctrica",
            "Tamaño: estándar",
            "Material: caoba y aluminio",
            "Mecanismo: cuerda",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["guitarra acústica"],
        features: [
            "Marca: Vibra",
            "Tipo: acústica",
            "Tamaño: estándar",
            "Material: caoba",
            "Mecanismo: cuerda",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["viola"],
        features: [
            "Marca: stentor",
            "Tipo: acústico",
            "Tamaño: pequeña",
            "Material: pino",
            "Mecanismo: cuerda",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["trompeta"],
        features: [
            "Marca: Eastrock",
            "Tipo: piccolo",
            "Tamaño: estándar",
            "Material: aluminio",
            "Mecanismo: viento",
            "Producto: instrumento musical",
        ],
    },
    FallbackEntry {
        patterns: &["acordeon"],
        features: [
            "Marca: Yingwu",
            "Tipo: acordeon",
            "Tamaño: estándar",
            "Material: Aluminio",
            "Mecanismo: Cuerda y viento",
            "Producto: instrumento musical",
        ],
    },
];

/// Used when no table entry matches.
const GENERIC_FEATURES: [&str; 2] = ["Característica genérica", "Producto: instrumento musical"];

/// Derive display features from a product name.
///
/// Deterministic: the same name always yields the same list.
#[must_use]
pub fn fallback_features(name: &str) -> Vec<String> {
    let name = name.to_lowercase();

    FALLBACK_TABLE
        .iter()
        .find(|entry| entry.patterns.iter().all(|p| name.contains(p)))
        .map_or_else(
            || GENERIC_FEATURES.iter().map(ToString::to_string).collect(),
            |entry| entry.features.iter().map(ToString::to_string).collect(),
        )
}
