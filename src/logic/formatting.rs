use ufmt::uWrite;

/// Largest magnitude that still fits the integer part into a u32
const FLOAT_PRINT_LIMIT: f32 = 4_294_967_040.;

/// Print a float with a fixed number of decimals, rounding half up at the
/// last printed digit.
///
/// Matches Arduino's `Print::print(double, digits)`, including `nan`,
/// `inf` (for either sign) and `ovf` for values whose integer part would not
/// fit into 32 bits.
pub fn write_float<W: uWrite>(out: &mut W, value: f32, precision: u8) -> Result<(), W::Error> {
    if value.is_nan() {
        return out.write_str("nan");
    }
    if value.is_infinite() {
        return out.write_str("inf");
    }
    if !(-FLOAT_PRINT_LIMIT..=FLOAT_PRINT_LIMIT).contains(&value) {
        return out.write_str("ovf");
    }

    let mut value = value;
    if value < 0. {
        out.write_char('-')?;
        value = -value;
    }

    let mut rounding = 0.5_f32;
    for _ in 0..precision {
        rounding /= 10.;
    }
    value += rounding;

    let int_part = value as u32;
    let mut remainder = value - int_part as f32;
    ufmt::uwrite!(out, "{}", int_part)?;

    if precision > 0 {
        out.write_char('.')?;
    }
    for _ in 0..precision {
        remainder *= 10.;
        let digit = remainder as u8;
        ufmt::uwrite!(out, "{}", digit)?;
        remainder -= digit as f32;
    }

    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::write_float;

    fn format_float(value: f32, precision: u8) -> heapless::String<16> {
        let mut output: heapless::String<16> = heapless::String::new();
        write_float(&mut output, value, precision).unwrap();
        output
    }

    pub fn format_float_zero() {
        let res = format_float(0., 2);
        assert_eq!(res.as_str(), "0.00");
    }

    pub fn format_float_small_fract() {
        let res = format_float(1.01, 2);
        assert_eq!(res.as_str(), "1.01");
    }

    pub fn format_float_smaller_fract() {
        let res = format_float(1.001, 2);
        assert_eq!(res.as_str(), "1.00");
    }

    pub fn format_float_more_digits() {
        let res = format_float(123.456, 2);
        assert_eq!(res.as_str(), "123.46");
    }

    pub fn format_float_carry_over() {
        let res = format_float(9.996, 2);
        assert_eq!(res.as_str(), "10.00");
    }

    pub fn format_float_negative() {
        let res = format_float(-12.345, 2);
        assert_eq!(res.as_str(), "-12.35");
    }

    pub fn format_float_no_decimals() {
        let res = format_float(4.5, 0);
        assert_eq!(res.as_str(), "5");
    }

    pub fn format_float_special_values() {
        assert_eq!(format_float(f32::NAN, 2).as_str(), "nan");
        assert_eq!(format_float(f32::INFINITY, 2).as_str(), "inf");
        assert_eq!(format_float(f32::NEG_INFINITY, 2).as_str(), "inf");
        assert_eq!(format_float(5e9, 2).as_str(), "ovf");
        assert_eq!(format_float(-5e9, 2).as_str(), "ovf");
    }
}
