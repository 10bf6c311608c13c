//! Built-in behavioral cases.
//!
//! Each case is a literal (input, expected output, expected diagnostics)
//! triple run through the default [`Rewriter`]. A case expects a change
//! exactly when its input and output differ.

use crate::pipeline::Rewriter;
use serde::Serialize;

/// One behavioral case
#[derive(Debug, Clone, Copy)]
pub struct Case {
    pub name: &'static str,
    pub input: &'static [&'static str],
    pub expected: &'static [&'static str],
    pub diagnostics: &'static [&'static str],
}

impl Case {
    const fn new(name: &'static str, input: &'static [&'static str], expected: &'static [&'static str]) -> Self {
        Self {
            name,
            input,
            expected,
            diagnostics: &[],
        }
    }

    const fn reporting(mut self, diagnostics: &'static [&'static str]) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Whether the case expects the file to be reported as changed
    #[must_use]
    pub fn expects_change(&self) -> bool {
        self.input != self.expected
    }
}

/// Result of running one case
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub passed: bool,
    pub mismatches: Vec<String>,
}

pub static CASES: &[Case] = &[
    // Includes
    Case::new(
        "quote include",
        &[
            "#include \"wpi/units/area.hpp\"\n",
            "#include \"wpi/units/length.hpp\"\n",
            "#include \"wpi/units/volume.hpp\"\n",
        ],
        &["#include \"wpi/units.hpp\"\n"],
    ),
    Case::new(
        "okay includes",
        &[
            "#include <utility>\n",
            "#include \"wpi/util/string.h\"\n",
            "#include \"wpi/units.hpp\"\n",
        ],
        &[
            "#include <utility>\n",
            "#include \"wpi/util/string.h\"\n",
            "#include \"wpi/units.hpp\"\n",
        ],
    ),
    Case::new(
        "crlf include",
        &["#include <units/length.h>\r\n", "int x;\r\n"],
        &["#include \"wpi/units.hpp\"\r\n", "int x;\r\n"],
    ),
    Case::new(
        "add usc include",
        &[
            "#include \"wpi/units/length.hpp\"\n",
            "\n",
            "static constexpr auto x = 1_in;\n",
        ],
        &[
            "#include \"wpi/units-usc.hpp\"\n",
            "#include \"wpi/units.hpp\"\n",
            "\n",
            "static constexpr auto x = 1.0 * mp::in;\n",
        ],
    ),
    Case::new(
        "usc include for psi",
        &["#include \"units/pressure.h\"\n", "auto p = 30_psi;\n"],
        &[
            "#include \"wpi/units-usc.hpp\"\n",
            "#include \"wpi/units.hpp\"\n",
            "auto p = 30.0 * mp::lb / mp::in / mp::in;\n",
        ],
    ),
    // Renames
    Case::new("math", &["wpi::units::math::hypot(x, y)\n"], &["mp::hypot(x, y)\n"]),
    Case::new(
        "math max",
        &["auto m = units::math::max(a, b);\n"],
        &["auto m = std::max(a, b);\n"],
    )
    .reporting(&["line 1: units::math::max replaced with std::max, <algorithm> include may need to be added"]),
    Case::new(
        "angle concept",
        &["void Turn(units::angle_unit auto a);\n"],
        &["void Turn(mp::QuantityOf<mp::angle> auto a);\n"],
    ),
    // Types
    Case::new("meter", &["wpi::units::meter_t x;\n"], &["mp::quantity<mp::m> x;\n"]),
    Case::new("short namespace meter", &["units::meter_t x;\n"], &["mp::quantity<mp::m> x;\n"]),
    Case::new(
        "meters",
        &["Translation2d(wpi::units::meter_t x, wpi::units::meter_t y);\n"],
        &["Translation2d(mp::quantity<mp::m> x, mp::quantity<mp::m> y);\n"],
    ),
    Case::new(
        "brace initialized variable",
        &["units::meter_t x{5};\n"],
        &["mp::quantity<mp::m> x{5};\n"],
    )
    .reporting(&["line 1: Quantity variable could be initialized from a scalar"]),
    Case::new("instantiation", &["wpi::units::meter_t{0}\n"], &["0.0 * mp::m\n"]),
    Case::new("instantiation exponent", &["wpi::units::meter_t{1e-9}\n"], &["1e-9 * mp::m\n"]),
    Case::new(
        "instantiation multi in line",
        &["wpi::units::meter_t{x}, wpi::units::meter_t{y}\n"],
        &["x * mp::m, y * mp::m\n"],
    ),
    Case::new(
        "instantiation multiline",
        &["wpi::units::meter_t{\n", "  double{0}}\n"],
        &["  double{0} * mp::m\n"],
    ),
    Case::new("instantiation division", &["1 / wpi::units::meter_t{x}\n"], &["1 / (x * mp::m)\n"]),
    Case::new(
        "instantiation unit composition",
        &["1_V / wpi::units::unit_t<Distance>{1}\n"],
        &["1.0 * mp::V / Distance\n"],
    ),
    Case::new(
        "double instantiation unit composition",
        &["wpi::units::volt_t{1} / wpi::units::unit_t<Distance>{1}\n"],
        &["1.0 * mp::V / Distance\n"],
    ),
    Case::new(
        "instantiation unit composition parenthesized",
        &["4.0_V / (wpi::units::unit_t<Distance>{1} / 1_s)\n"],
        &["4.0 * mp::V / (Distance / mp::s)\n"],
    )
    .reporting(&["line 1: Assuming that Distance is a unit template argument"]),
    Case::new(
        "short namespace unit composition parenthesized",
        &["4.0_V / (units::unit_t<Distance>{1} / 1_s)\n"],
        &["4.0 * mp::V / (Distance / mp::s)\n"],
    )
    .reporting(&["line 1: Assuming that Distance is a unit template argument"]),
    Case::new("instantiation subtraction", &["wpi::units::meter_t{x - y}\n"], &["(x - y) * mp::m\n"]),
    Case::new(
        "instantiation parenthesized addition",
        &["wpi::units::meter_t{(x + y) / 2}\n"],
        &["(x + y) / 2.0 * mp::m\n"],
    ),
    Case::new(
        "unit conversion",
        &["wpi::units::second_t{dt}.value();\n"],
        &["mp::value(dt.in(mp::s));\n"],
    ),
    Case::new(
        "unit conversion two",
        &["double{wpi::units::second_t{-10_ms} / foo}\n"],
        &["double{(-10.0 * mp::ms).in(mp::s) / foo}\n"],
    ),
    Case::new(
        "unit conversion literal",
        &["wpi::units::radian_t{90_deg}\n"],
        &["(90.0 * mp::deg).in(mp::rad)\n"],
    ),
    Case::new(
        "unit conversion literal value",
        &["wpi::units::radian_t{90_deg}.value();\n"],
        &["mp::value((90.0 * mp::deg).in(mp::rad));\n"],
    ),
    Case::new(
        "unit conversion multiline",
        &["wpi::units::second_t{dt}\n", "    .value();\n"],
        &["mp::value(dt.in(mp::s)\n", "    );\n"],
    ),
    Case::new(
        "unit conversion .to<>()",
        &["wpi::units::microsecond_t{time}.to<uint64_t>()\n"],
        &["static_cast<uint64_t>(mp::value(time.in(mp::µs)))\n"],
    ),
    Case::new(
        "unit conversion addition",
        &["wpi::units::radian_t{a + b}.value()\n"],
        &["mp::value((a + b).in(mp::rad))\n"],
    ),
    Case::new(
        "unit conversion division",
        &["wpi::units::radian_t{a / b}.value()\n"],
        &["mp::value((a / b).in(mp::rad))\n"],
    ),
    Case::new("unit_t integer", &["wpi::units::unit_t<kv_unit>(0)\n"], &["0.0 * kv_unit\n"]),
    Case::new(
        "unit_t blank line",
        &["wpi::units::meter_t{\n", "  x}\n"],
        &["  x * mp::m\n"],
    ),
    Case::new(
        "unit_t argument spanning lines",
        &["units::unit_t<\n", "    kv_unit>{x}\n"],
        &["units::unit_t<\n", "    kv_unit>{x}\n"],
    )
    .reporting(&[
        "line 1: units::unit_t<...> is too complicated!",
        "note: 1 instance of old units remaining that need manual updating",
    ]),
    Case::new(
        "unknown type is residual",
        &["units::foo_t x;\n"],
        &["units::foo_t x;\n"],
    )
    .reporting(&["note: 1 instance of old units remaining that need manual updating"]),
    // Value extraction
    Case::new(
        "skipped .value()",
        &["// next line non-unit .value()\n", "opt.value()\n"],
        &["opt.value()\n"],
    ),
    Case::new(
        "skipped same line .value()",
        &["opt.value()  // non-unit .value()\n"],
        &["opt.value()\n"],
    ),
    Case::new(
        "skipped same line .value() different space",
        &[
            "  g = gradientF.value();  // non-unit .value()\n",
            "  h = hessianF.value();   // non-unit .value()\n",
        ],
        &["  g = gradientF.value();\n", "  h = hessianF.value();\n"],
    ),
    Case::new("parenthesized .value()", &["(x).value()\n"], &["mp::value(x)\n"]),
    Case::new(
        "parenthesized .value() multi in line",
        &["(x).value(), (y).value()\n"],
        &["mp::value(x), mp::value(y)\n"],
    ),
    Case::new(
        "double value() function",
        &["f(x.value(), y.value())\n"],
        &["f(mp::value(x), mp::value(y))\n"],
    ),
    Case::new("return .value()", &["return x.value();\n"], &["return mp::value(x);\n"]),
    Case::new(
        "multiline .value()",
        &["(x * (y /\n", " z))\n", "    .value()\n"],
        &["mp::value(x * (y /\n", " z))\n"],
    ),
    Case::new(
        "method call result .value()",
        &["RoboRioSim::GetUserVoltage3V3().value()\n"],
        &["mp::value(RoboRioSim::GetUserVoltage3V3())\n"],
    ),
    // Conversion calls
    Case::new(".to<double>()", &["a + x.to<double>()\n"], &["a + mp::value(x)\n"]),
    Case::new(
        ".to<uint64_t>()",
        &["count + x.to<uint64_t>()\n"],
        &["count + static_cast<uint64_t>(mp::value(x))\n"],
    ),
    Case::new("non-call .to<>", &["auto f = x.to<double>;\n"], &["auto f = x.to<double>;\n"])
        .reporting(&["line 1: Unexpected non-call .to<>!"]),
    // Literals
    Case::new("UDL m", &["0_m\n"], &["0.0 * mp::m\n"]),
    Case::new("UDL decimal", &["0.5_m\n"], &["0.5 * mp::m\n"]),
    Case::new("UDL mps", &["0_mps\n"], &["0.0 * mp::m / mp::s\n"]),
    Case::new("UDL exponent", &["1e-9_m\n"], &["1e-9 * mp::m\n"]),
    Case::new("UDL division", &["1 / 2_rad\n"], &["1 / (2.0 * mp::rad)\n"]),
    Case::new("UDL simple unit composition", &["1_V / 1_s\n"], &["1.0 * mp::V / mp::s\n"]),
    Case::new("UDL unit composition", &["1_V / 1_mps\n"], &["1.0 * mp::V / (mp::m / mp::s)\n"]),
    Case::new("UDL suffix on identifier", &["auto y = x2_m;\n"], &["auto y = x2_m;\n"]),
    // Bare units
    Case::new("unit plural", &["wpi::units::meters\n"], &["mp::m\n"]),
    Case::new("unit singular", &["wpi::units::meter\n"], &["mp::m\n"]),
    // Blocks
    Case::new(
        "decltype",
        &["decltype(1_V / 1_mps)\n"],
        &["mp::quantity<mp::V / (mp::m / mp::s)>\n"],
    ),
    Case::new(
        "decltype unit instantiation",
        &["decltype(1_V / 1_mps){x}\n"],
        &["x * mp::V / (mp::m / mp::s)\n"],
    ),
    Case::new(
        "decltype unit conversion",
        &["decltype(1_V / 1_mps){x}.value()\n"],
        &["mp::value(x.in(mp::V / (mp::m / mp::s)))\n"],
    ),
    Case::new(
        "decltype multi in line",
        &["decltype(1_V / 1_mps) x, decltype(1_V / 1_mps_sq) y\n"],
        &["mp::quantity<mp::V / (mp::m / mp::s)> x, mp::quantity<mp::V / (mp::m / mp::s2)> y\n"],
    ),
    Case::new(
        "decltype multiline",
        &["decltype(1_V /\n", "         1_mps)\n"],
        &["mp::quantity<mp::V /\n", "         (mp::m / mp::s)>\n"],
    ),
    Case::new(
        "decltype instantiation multiline",
        &["decltype(1_V /\n", "         1_mps){x}\n"],
        &["x * mp::V / (mp::m / mp::s)\n"],
    ),
];

/// Run one case through `rewriter`
#[must_use]
pub fn run_case(rewriter: &Rewriter, case: &Case) -> CaseReport {
    let lines = case.input.iter().map(|line| (*line).to_string()).collect();
    let mut mismatches = Vec::new();

    match rewriter.transform(lines) {
        Ok(out) => {
            if out.lines != case.expected {
                mismatches.push(format!(
                    "output: expected {:?}, got {:?}",
                    case.expected, out.lines
                ));
            }
            if out.changed != case.expects_change() {
                mismatches.push(format!(
                    "changed: expected {}, got {}",
                    case.expects_change(),
                    out.changed
                ));
            }
            let diagnostics: Vec<String> = out.diagnostics.iter().map(ToString::to_string).collect();
            if diagnostics != case.diagnostics {
                mismatches.push(format!(
                    "diagnostics: expected {:?}, got {diagnostics:?}",
                    case.diagnostics
                ));
            }
        }
        Err(e) => mismatches.push(format!("error: {e}")),
    }

    if !mismatches.is_empty() {
        log::warn!("Case {:?} failed", case.name);
    }
    CaseReport {
        name: case.name.to_string(),
        passed: mismatches.is_empty(),
        mismatches,
    }
}

/// Run every built-in case with the default configuration
#[must_use]
pub fn run_all() -> Vec<CaseReport> {
    let rewriter = Rewriter::default();
    CASES.iter().map(|case| run_case(&rewriter, case)).collect()
}
