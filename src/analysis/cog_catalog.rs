use std::collections::HashMap;

use lazy_static::lazy_static;

/// Label used for category codes without a catalog entry, typically
/// multi-letter assignments such as `EGP`.
pub const MULTIPLE: &str = "Multiple";

lazy_static! {
    static ref COG_DESCRIPTIONS: HashMap<&'static str, &'static str> = {
        let mut descriptions = HashMap::new();
        descriptions.insert("A", "RNA processing and modification");
        descriptions.insert("B", "Chromatin structure and dynamics");
        descriptions.insert("C", "Energy production and conversion");
        descriptions.insert("D", "Cell cycle control, cell division, chromosome partitioning");
        descriptions.insert("E", "Amino acid transport and metabolism");
        descriptions.insert("F", "Nucleotide transport and metabolism");
        descriptions.insert("G", "Carbohydrate transport and metabolism");
        descriptions.insert("H", "Coenzyme transport and metabolism");
        descriptions.insert("I", "Lipid transport and metabolism");
        descriptions.insert("J", "Translation, ribosomal structure and biogenesis");
        descriptions.insert("K", "Transcription");
        descriptions.insert("L", "Replication, recombination and repair");
        descriptions.insert("M", "Cell wall/membrane/envelope biogenesis");
        descriptions.insert("N", "Cell motility");
        descriptions.insert("O", "Posttranslational modification, protein turnover, chaperones");
        descriptions.insert("P", "Inorganic ion transport and metabolism");
        descriptions.insert("Q", "Secondary metabolites biosynthesis, transport and catabolism");
        descriptions.insert("R", "General function prediction only");
        descriptions.insert("S", "Function unknown");
        descriptions.insert("T", "Signal transduction mechanisms");
        descriptions.insert("U", "Intracellular trafficking, secretion, and vesicular transport");
        descriptions.insert("V", "Defense mechanisms");
        descriptions.insert("W", "Extracellular structures");
        descriptions.insert("Y", "Nuclear structure");
        descriptions.insert("Z", "Cytoskeleton");

        descriptions
    };
}

/// Description of a single-letter COG category code.
pub fn describe(code: &str) -> Option<&'static str> {
    COG_DESCRIPTIONS.get(code).copied()
}

/// Chart label for a category code, `"K: Transcription"` style, falling back
/// to [`MULTIPLE`] for codes without a catalog entry.
pub fn label(code: &str) -> String {
    format!("{}: {}", code, describe(code).unwrap_or(MULTIPLE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letter_codes_are_described() {
        assert_eq!(describe("C"), Some("Energy production and conversion"));
        assert_eq!(describe("Z"), Some("Cytoskeleton"));
    }

    #[test]
    fn multi_letter_codes_fall_back_to_multiple() {
        assert_eq!(describe("EGP"), None);
        assert_eq!(label("EGP"), "EGP: Multiple");
    }

    #[test]
    fn label_joins_code_and_description() {
        assert_eq!(label("K"), "K: Transcription");
    }
}
