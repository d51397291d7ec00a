use crate::traits::NameDirectory;
use crate::utils::Consts;

/// Cantidad de simbolos del alfabeto de los nombres: [a-z], [A-Z], [0-9] y el guion bajo.
pub const ALPHABET_SIZE: usize = 26 * 2 + 10 + 1;

const OFFSET_LOWER: usize = 0;
const OFFSET_UPPER: usize = 26;
const OFFSET_DIGIT: usize = 52;
const OFFSET_UNDERSCORE: usize = 62;

/// Indice de un nodo dentro del pool del trie.
///
/// El valor 0 esta reservado: como hijo significa "no existe" y como nodo es la raiz.
type TrieId = u32;

/// Nodo del trie. Cada hijo es un indice dentro del pool del trie.
#[derive(Clone)]
struct TrieNode {
    children: [TrieId; ALPHABET_SIZE],

    /// Handle del ingrediente cuyo nombre termina en este nodo.
    dest: Option<u32>,
}

impl TrieNode {
    fn new() -> Self {
        TrieNode {
            children: [0; ALPHABET_SIZE],
            dest: None,
        }
    }
}

/// Directorio de nombres de ingredientes.
///
/// Es un trie sobre el alfabeto `[A-Za-z0-9_]` con los nodos guardados en un pool
/// indexado por enteros, asi un nodo son 63 slots de hijos y nada mas. Tanto el
/// lookup como el intern recorren un nodo por caracter, es decir O(|nombre|).
///
/// El directorio de ingredientes nunca elimina entradas, por eso el pool solo crece.
pub struct Trie {
    pool: Vec<TrieNode>,
}

impl Trie {
    /// Crea el trie con la raiz en el indice 0 del pool. La capacidad inicial del
    /// pool se obtiene de `Consts::trie_pool_nodes()`.
    pub fn new() -> Self {
        let mut pool = Vec::with_capacity(Consts::trie_pool_nodes());
        pool.push(TrieNode::new());
        Trie { pool }
    }

    /// Cantidad de nodos vivos en el pool, contando la raiz.
    pub fn node_count(&self) -> usize {
        self.pool.len()
    }

    /// Posicion del caracter dentro del arreglo de hijos de un nodo.
    ///
    /// Los caracteres fuera del alfabeto no tienen posicion y se ignoran al recorrer.
    fn slot_of(c: u8) -> Option<usize> {
        match c {
            b'a'..=b'z' => Some(OFFSET_LOWER + (c - b'a') as usize),
            b'A'..=b'Z' => Some(OFFSET_UPPER + (c - b'A') as usize),
            b'0'..=b'9' => Some(OFFSET_DIGIT + (c - b'0') as usize),
            b'_' => Some(OFFSET_UNDERSCORE),
            _ => None,
        }
    }

    /// Desciende por el trie siguiendo el nombre, sin crear nodos.
    /// Devuelve el indice del nodo final o None si algun tramo del camino no existe.
    fn walk(&self, name: &str) -> Option<usize> {
        let mut current = 0_usize;
        for slot in name.bytes().filter_map(Self::slot_of) {
            let child = self.pool[current].children[slot];
            if child == 0 {
                return None;
            }
            current = child as usize;
        }
        Some(current)
    }

    /// Desciende por el trie siguiendo el nombre, creando los nodos que falten.
    fn walk_or_create(&mut self, name: &str) -> usize {
        let mut current = 0_usize;
        for slot in name.bytes().filter_map(Self::slot_of) {
            let mut child = self.pool[current].children[slot];
            if child == 0 {
                child = self.alloc_node();
                self.pool[current].children[slot] = child;
            }
            current = child as usize;
        }
        current
    }

    /// Reemplaza al malloc de los nodos: agrega un nodo vacio al pool y devuelve su indice.
    fn alloc_node(&mut self) -> TrieId {
        self.pool.push(TrieNode::new());
        (self.pool.len() - 1) as TrieId
    }
}

impl NameDirectory for Trie {
    fn lookup(&self, name: &str) -> Option<u32> {
        self.walk(name).and_then(|node| self.pool[node].dest)
    }

    fn intern(&mut self, name: &str, next_id: u32) -> u32 {
        let node = self.walk_or_create(name);
        *self.pool[node].dest.get_or_insert(next_id)
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests_trie {
    use super::*;

    #[test]
    fn test1_intern_a_new_name_binds_the_received_id() {
        let mut trie = Trie::new();
        assert_eq!(trie.intern("farina", 0), 0);
        assert_eq!(trie.lookup("farina"), Some(0));
    }

    #[test]
    fn test2_intern_an_existing_name_returns_the_original_id() {
        let mut trie = Trie::new();
        assert_eq!(trie.intern("farina", 0), 0);
        assert_eq!(trie.intern("farina", 7), 0);
    }

    #[test]
    fn test3_lookup_of_an_unknown_name_returns_none() {
        let mut trie = Trie::new();
        trie.intern("zucchero_di_canna", 0);

        assert_eq!(trie.lookup("zucchero"), None); // prefijo sin handle asociado
        assert_eq!(trie.lookup("sale"), None);
        assert_eq!(trie.lookup("zucchero_di_canna_x"), None);
    }

    #[test]
    fn test4_names_with_shared_prefix_share_nodes_and_get_distinct_ids() {
        let mut trie = Trie::new();
        trie.intern("uova", 0);
        let nodes_first = trie.node_count();
        trie.intern("uovax", 1);

        // el segundo nombre solo agrega el nodo de su ultimo caracter
        assert_eq!(trie.node_count(), nodes_first + 1);
        assert_eq!(trie.lookup("uova"), Some(0));
        assert_eq!(trie.lookup("uovax"), Some(1));
    }

    #[test]
    fn test5_full_alphabet_names_are_accepted() {
        let mut trie = Trie::new();
        trie.intern("Az0_9z", 3);
        assert_eq!(trie.lookup("Az0_9z"), Some(3));
    }
}
