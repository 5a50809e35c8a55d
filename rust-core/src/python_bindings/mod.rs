//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod engine_bindings;

/// Python module definition
#[pymodule]
fn fr_spectra(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<engine_bindings::PyAnalysisEngine>()?;
    m.add_function(wrap_pyfunction!(engine_bindings::normalize_display, m)?)?;

    Ok(())
}
