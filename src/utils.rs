/// Shared utility functions for the history scraper
///
/// Delimiter between station name and station code in the dashboard heading
pub const HEADING_DELIMITER: &str = " - ";

/// Extract the station code from a dashboard heading
///
/// Headings read "<station name> - <code>". The code is the segment right after
/// the first delimiter; anything after a second delimiter is ignored.
///
/// # Examples
///
/// ```
/// use pws_history::utils::extract_station_code;
///
/// assert_eq!(extract_station_code("Centro - IMADRI882").unwrap(), "IMADRI882");
/// assert_eq!(extract_station_code("Las Tablas - IMADRI1 - PWS").unwrap(), "IMADRI1");
/// assert!(extract_station_code("Centro IMADRI882").is_err());
/// ```
pub fn extract_station_code(heading: &str) -> Result<String, &'static str> {
    heading
        .split(HEADING_DELIMITER)
        .nth(1)
        .map(|code| code.trim().to_string())
        .ok_or("Heading has no ' - ' delimiter")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_station_code_clean() {
        assert_eq!(
            extract_station_code("Barrio de Salamanca - IMADRI265").unwrap(),
            "IMADRI265"
        );
    }

    #[test]
    fn test_extract_station_code_hyphenated_name() {
        // A hyphen without surrounding spaces is part of the name
        assert_eq!(
            extract_station_code("Alcalá-Centro - IALCAL12").unwrap(),
            "IALCAL12"
        );
    }

    #[test]
    fn test_extract_station_code_takes_second_segment() {
        assert_eq!(extract_station_code("A - B - C").unwrap(), "B");
    }

    #[test]
    fn test_extract_station_code_no_delimiter() {
        assert!(extract_station_code("IMADRI265").is_err());
    }

    #[test]
    fn test_extract_station_code_empty() {
        assert!(extract_station_code("").is_err());
    }
}
