/// Validate a browse name.
///
/// Browse names appear in relative paths, so they must be non empty and must not contain
/// the characters reserved by the relative path syntax.
pub fn validate_browse_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("browse name must not be empty".into());
    }
    for c in name.chars() {
        if matches!(c, '/' | '.' | '<' | '>' | ':' | '#' | '!' | '&') {
            return Err(format!(
                "browse name {name} cannot contain any of '/', '.', '<', '>', ':', '#', '!' or '&'"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_browse_name_valid_strings() {
        assert!(validate_browse_name("Pump").is_ok());
        assert!(validate_browse_name("Pump123").is_ok());
        assert!(validate_browse_name("pump_speed").is_ok());
    }

    #[test]
    fn test_validate_browse_name_invalid_strings() {
        assert!(validate_browse_name("").is_err());
        assert!(validate_browse_name("pump/speed").is_err());
        assert!(validate_browse_name("pump.speed").is_err());
        assert!(validate_browse_name("ns:speed").is_err());
        assert!(validate_browse_name("<speed>").is_err());
        assert!(validate_browse_name("speed#1").is_err());
    }
}
