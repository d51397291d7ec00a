use std::io;

use crate::enums::ErrorType;

/// Estructura para manejar los errores de la pasticceria
#[derive(Debug)]
pub struct ErrorPasticceria {
    /// Mensaje de error
    pub mensaje: String,

    /// Tipo de error
    pub type_error: ErrorType,
}

impl ErrorPasticceria {
    /// Crea el error con un mensaje y un tipo de error generico.
    pub fn new(mensaje: &str) -> Self {
        ErrorPasticceria {
            mensaje: mensaje.to_string(),
            type_error: ErrorType::ErrorGeneric,
        }
    }

    /// Crea el error con un mensaje y un tipo de error especifico.
    pub fn new_of_type(mensaje: &str, type_error: ErrorType) -> Self {
        ErrorPasticceria {
            mensaje: mensaje.to_string(),
            type_error,
        }
    }
}

impl From<io::Error> for ErrorPasticceria {
    /// Las respuestas de los comandos se escriben con `writeln!` sobre la salida,
    /// asi que los errores de escritura se convierten directamente para poder
    /// propagarlos con `?`.
    fn from(error: io::Error) -> Self {
        ErrorPasticceria::new_of_type(&error.to_string(), ErrorType::ErrorWritingOutput)
    }
}
