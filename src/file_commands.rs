use itertools::Itertools;

use crate::enums::ErrorType;
use crate::error_pasticceria::ErrorPasticceria;
use crate::utils::MAX_NAME_LEN;

/// Comando tipado leido de una linea de la entrada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `aggiungi_ricetta <receta> (<ingrediente> <unidades>)+`
    AddRecipe {
        name: String,
        ingredients: Vec<(String, u64)>,
    },

    /// `rimuovi_ricetta <receta>`
    RemoveRecipe { name: String },

    /// `rifornimento (<ingrediente> <cantidad> <vencimiento>)+`
    Replenish { lots: Vec<(String, u64, u64)> },

    /// `ordine <receta> <cantidad>`
    PlaceOrder { recipe: String, quantity: u64 },
}

/// Parsea la primera linea de la entrada, que define el funcionamiento del camioncino:
///
/// ```txt
/// <intervalo_camioncino> <capacidad_camioncino>
/// ```
///
/// Ambos valores son enteros positivos.
///
/// # Arguments
///  * `line` - Primera linea de la entrada.
/// # Returns
///  * Si es Ok, la tupla `(intervalo, capacidad)`.
///  * Si es Err, `ErrorPasticceria` debido a que la linea no tiene los dos enteros.
pub fn parse_header(line: &str) -> Result<(u64, u64), ErrorPasticceria> {
    let mut tokens = line.split_whitespace();
    let (interval, capacity) = match (tokens.next(), tokens.next()) {
        (Some(interval), Some(capacity)) => (parse_int(interval)?, parse_int(capacity)?),
        _ => {
            return Err(ErrorPasticceria::new_of_type(
                "Error parsing the courier header line",
                ErrorType::IncorrectCommandFile,
            ))
        }
    };

    if interval == 0 || capacity == 0 {
        return Err(ErrorPasticceria::new_of_type(
            "The courier interval and capacity must be positive",
            ErrorType::IncorrectCommandFile,
        ));
    }
    Ok((interval, capacity))
}

/// Parsea una linea de comando. Cada linea empieza con la palabra clave del comando
/// seguida de sus argumentos separados por espacios:
///
/// ```txt
/// aggiungi_ricetta torta farina 2 zucchero 1
/// rimuovi_ricetta torta
/// rifornimento farina 10 100 zucchero 10 100
/// ordine torta 3
/// ```
///
/// Los nombres usan el alfabeto `[A-Za-z0-9_]` con hasta 255 caracteres, y las
/// cantidades y vencimientos son enteros no negativos.
///
/// # Arguments
///  * `line` - Linea completa del comando.
/// # Returns
///  * Si es Ok, el `Command` tipado con sus argumentos.
///  * Si es Err, `ErrorPasticceria` debido a una palabra clave desconocida o a
///    argumentos incompletos o no numericos.
pub fn parse_command(line: &str) -> Result<Command, ErrorPasticceria> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next().ok_or_else(|| {
        ErrorPasticceria::new_of_type("Empty command line", ErrorType::IncorrectCommandFile)
    })?;

    match keyword {
        "aggiungi_ricetta" => {
            let name = next_name(&mut tokens)?;
            let rest: Vec<&str> = tokens.collect();
            if rest.is_empty() || rest.len() % 2 != 0 {
                return Err(incomplete_arguments(keyword));
            }

            let ingredients = rest
                .into_iter()
                .tuples()
                .map(|(ingredient, quantity)| Ok((checked_name(ingredient)?, parse_int(quantity)?)))
                .collect::<Result<Vec<(String, u64)>, ErrorPasticceria>>()?;

            Ok(Command::AddRecipe { name, ingredients })
        }
        "rimuovi_ricetta" => Ok(Command::RemoveRecipe {
            name: next_name(&mut tokens)?,
        }),
        "rifornimento" => {
            let rest: Vec<&str> = tokens.collect();
            if rest.is_empty() || rest.len() % 3 != 0 {
                return Err(incomplete_arguments(keyword));
            }

            let lots = rest
                .into_iter()
                .tuples()
                .map(|(ingredient, quantity, expiration)| {
                    Ok((
                        checked_name(ingredient)?,
                        parse_int(quantity)?,
                        parse_int(expiration)?,
                    ))
                })
                .collect::<Result<Vec<(String, u64, u64)>, ErrorPasticceria>>()?;

            Ok(Command::Replenish { lots })
        }
        "ordine" => {
            let recipe = next_name(&mut tokens)?;
            let quantity = tokens
                .next()
                .ok_or_else(|| incomplete_arguments(keyword))
                .and_then(parse_int)?;

            Ok(Command::PlaceOrder { recipe, quantity })
        }
        _ => Err(ErrorPasticceria::new_of_type(
            &format!("Unknown command keyword: {}", keyword),
            ErrorType::IncorrectCommandFile,
        )),
    }
}

fn incomplete_arguments(keyword: &str) -> ErrorPasticceria {
    ErrorPasticceria::new_of_type(
        &format!("Incomplete arguments for the command {}", keyword),
        ErrorType::IncorrectCommandFile,
    )
}

/// Toma el siguiente token como nombre, validando su longitud.
fn next_name<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<String, ErrorPasticceria> {
    let name = tokens.next().ok_or_else(|| {
        ErrorPasticceria::new_of_type(
            "Missing a name in the command line",
            ErrorType::IncorrectCommandFile,
        )
    })?;
    checked_name(name)
}

/// Valida que el nombre no supere la longitud maxima permitida.
fn checked_name(name: &str) -> Result<String, ErrorPasticceria> {
    if name.len() > MAX_NAME_LEN {
        return Err(ErrorPasticceria::new_of_type(
            "Name longer than the allowed maximum",
            ErrorType::IncorrectCommandFile,
        ));
    }
    Ok(name.to_string())
}

/// Funcion encargada de parsear una palabra para convertirla en un entero.
///
/// # Arguments
///  * `word` - Palabra a parsear. Por ejemplo "3232"
/// # Returns
///  * Si es Ok, el entero parseado.
///  * Si es Err, `ErrorPasticceria` debido a que la palabra no era un entero no negativo.
fn parse_int(word: &str) -> Result<u64, ErrorPasticceria> {
    word.parse::<u64>().map_err(|_| {
        ErrorPasticceria::new_of_type(
            &format!("Error parsing an integer: {}", word),
            ErrorType::IncorrectCommandFile,
        )
    })
}

#[cfg(test)]
mod tests_file_commands {
    use super::*;

    #[test]
    fn test1_parse_header_with_interval_and_capacity() {
        assert_eq!(parse_header("5 100").unwrap(), (5, 100));
        assert_eq!(
            parse_header("5").unwrap_err().type_error,
            ErrorType::IncorrectCommandFile
        );
        assert_eq!(
            parse_header("0 100").unwrap_err().type_error,
            ErrorType::IncorrectCommandFile
        );
    }

    #[test]
    fn test2_parse_add_recipe_with_two_ingredients() {
        let command = parse_command("aggiungi_ricetta torta farina 2 zucchero 1").unwrap();
        assert_eq!(
            command,
            Command::AddRecipe {
                name: "torta".to_string(),
                ingredients: vec![
                    ("farina".to_string(), 2),
                    ("zucchero".to_string(), 1),
                ],
            }
        );
    }

    #[test]
    fn test3_parse_remove_recipe_and_order() {
        assert_eq!(
            parse_command("rimuovi_ricetta torta").unwrap(),
            Command::RemoveRecipe {
                name: "torta".to_string()
            }
        );
        assert_eq!(
            parse_command("ordine torta 3").unwrap(),
            Command::PlaceOrder {
                recipe: "torta".to_string(),
                quantity: 3
            }
        );
    }

    #[test]
    fn test4_parse_replenish_with_two_lots() {
        let command = parse_command("rifornimento farina 10 100 zucchero 7 42").unwrap();
        assert_eq!(
            command,
            Command::Replenish {
                lots: vec![
                    ("farina".to_string(), 10, 100),
                    ("zucchero".to_string(), 7, 42),
                ],
            }
        );
    }

    #[test]
    fn test5_unknown_keyword_and_incomplete_arguments_are_errors() {
        assert_eq!(
            parse_command("sforna_tutto").unwrap_err().type_error,
            ErrorType::IncorrectCommandFile
        );
        // a la receta le falta la cantidad de su ultimo ingrediente
        assert_eq!(
            parse_command("aggiungi_ricetta torta farina").unwrap_err().type_error,
            ErrorType::IncorrectCommandFile
        );
        assert_eq!(
            parse_command("rifornimento farina 10").unwrap_err().type_error,
            ErrorType::IncorrectCommandFile
        );
        assert_eq!(
            parse_command("ordine torta tres").unwrap_err().type_error,
            ErrorType::IncorrectCommandFile
        );
    }
}
