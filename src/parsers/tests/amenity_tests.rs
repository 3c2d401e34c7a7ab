use crate::parsers::{AmenityCounts, parse_amenities};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_lines() {
        let lines = vec!["4 viajeros", "2 dormitorios", "3 camas", "1 baño"];
        let counts = parse_amenities(&lines);
        assert_eq!(
            counts,
            AmenityCounts {
                travelers: Some(4),
                bedrooms: Some(2),
                beds: Some(3),
                baths: Some(1),
            }
        );
    }

    #[test]
    fn test_singular_and_plural_forms() {
        let counts = parse_amenities(&["1 viajero", "1 dormitorio", "1 cama", "2 baños"]);
        assert_eq!(counts.travelers, Some(1));
        assert_eq!(counts.bedrooms, Some(1));
        assert_eq!(counts.beds, Some(1));
        assert_eq!(counts.baths, Some(2));

        let counts = parse_amenities(&["6 guests", "1 bedroom", "2 beds", "1.5 baths"]);
        assert_eq!(counts.travelers, Some(6));
        assert_eq!(counts.bedrooms, Some(1));
        assert_eq!(counts.beds, Some(2));
        assert_eq!(counts.baths, Some(1));
    }

    #[test]
    fn test_bed_does_not_match_bedroom() {
        let counts = parse_amenities(&["3 bedrooms"]);
        assert_eq!(counts.bedrooms, Some(3));
        assert_eq!(counts.beds, None);
    }

    #[test]
    fn test_unmatched_categories_stay_empty() {
        let counts = parse_amenities(&["Estudio", "· 2 camas", "Baño compartido"]);
        assert_eq!(counts.beds, Some(2));
        assert_eq!(counts.travelers, None);
        assert_eq!(counts.bedrooms, None);
        assert_eq!(counts.baths, None);

        let empty: [&str; 0] = [];
        assert_eq!(parse_amenities(&empty), AmenityCounts::default());
    }

    #[test]
    fn test_first_match_per_category_wins() {
        let counts = parse_amenities(&["2 camas", "5 camas"]);
        assert_eq!(counts.beds, Some(2));
    }

    #[test]
    fn test_line_order_does_not_matter() {
        let lines = ["4 viajeros", "2 dormitorios", "3 camas", "1,5 baños"];
        let expected = parse_amenities(&lines);

        let mut reversed = lines;
        reversed.reverse();
        assert_eq!(parse_amenities(&reversed), expected);

        let rotated = [lines[2], lines[0], lines[3], lines[1]];
        assert_eq!(parse_amenities(&rotated), expected);
    }

    #[test]
    fn test_combined_summary_line() {
        let counts = parse_amenities(&["4 viajeros · 2 dormitorios · 2 camas · 1 baño"]);
        assert_eq!(counts.travelers, Some(4));
        assert_eq!(counts.bedrooms, Some(2));
        assert_eq!(counts.beds, Some(2));
        assert_eq!(counts.baths, Some(1));
    }
}
